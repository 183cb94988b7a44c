//! `spoke` command line tool: inspect, resave and export scene documents

use anyhow::Context;
use clap::{value_parser, Arg, ArgMatches, Command};
use spoke_editor::{logging, Editor, EditorConfig, LoadReport};
use std::path::{Path, PathBuf};

fn cli() -> Command {
    let scene = || {
        Arg::new("scene")
            .required(true)
            .value_parser(value_parser!(PathBuf))
            .help("Scene document to open")
    };
    let out = || {
        Arg::new("out")
            .required(true)
            .value_parser(value_parser!(PathBuf))
            .help("Output file")
    };

    Command::new("spoke")
        .version(spoke_editor::VERSION)
        .about("Spoke scene tools")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("assets")
                .long("assets")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Asset root (defaults to the scene's directory)"),
        )
        .subcommand(
            Command::new("inspect")
                .about("Load a scene and list its nodes and issues")
                .arg(scene()),
        )
        .subcommand(
            Command::new("resave")
                .about("Load a scene and save it again")
                .arg(scene())
                .arg(out()),
        )
        .subcommand(
            Command::new("export")
                .about("Write the export document for a scene")
                .arg(scene())
                .arg(out()),
        )
}

fn load_config(matches: &ArgMatches, scene: &Path) -> anyhow::Result<EditorConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => EditorConfig::load(path)?,
        None => {
            let root = scene
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
            EditorConfig::default().with_asset_root(root)
        }
    };
    if let Some(assets) = matches.get_one::<PathBuf>("assets") {
        config.asset_root.clone_from(assets);
    }
    Ok(config)
}

fn print_report(report: &LoadReport) {
    println!(
        "Loaded {} nodes, {} resource loads, {} failed",
        report.nodes,
        report.scheduled,
        report.errors.len()
    );
    for error in &report.errors {
        println!("  error: {error}");
    }
}

async fn run(command: &str, args: &ArgMatches, config: EditorConfig) -> anyhow::Result<()> {
    let Some(scene) = args.get_one::<PathBuf>("scene") else {
        return Ok(());
    };

    let mut editor = Editor::new(config);
    let report = editor
        .open_scene(scene, false)
        .await
        .with_context(|| format!("failed to open {}", scene.display()))?;

    match command {
        "inspect" => {
            print_report(&report);
            println!("Scene: {}", editor.scene().name());
            for node in editor.scene().iter() {
                let depth = ancestors(&editor, node.id());
                println!(
                    "{}{} [{}]",
                    "  ".repeat(depth + 1),
                    node.base().name,
                    node.component_name()
                );
            }
            let issues = editor.issues();
            if !issues.is_empty() {
                println!("Issues:");
                for entry in issues {
                    for issue in entry.issues {
                        println!("  {}: {issue}", entry.name);
                    }
                }
            }
            let stats = editor.ctx().textures.stats();
            println!("Textures fetched: {}", stats.fetches);
        }
        "resave" => {
            print_report(&report);
            if let Some(out) = args.get_one::<PathBuf>("out") {
                editor.save_scene(out).await?;
                println!("Saved {}", out.display());
            }
        }
        "export" => {
            print_report(&report);
            if let Some(out) = args.get_one::<PathBuf>("out") {
                let json = editor.export_document().to_json_pretty()?;
                tokio::fs::write(out, json)
                    .await
                    .with_context(|| format!("failed to write {}", out.display()))?;
                println!("Exported {}", out.display());
            }
        }
        _ => {}
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    let Some((command, args)) = matches.subcommand() else {
        return Ok(());
    };
    let Some(scene) = args.get_one::<PathBuf>("scene") else {
        return Ok(());
    };

    let config = load_config(args, scene)?;
    logging::init(&config)?;
    logging::log_config(&config);

    run(command, args, config).await
}

fn ancestors(editor: &Editor, id: spoke_node::NodeId) -> usize {
    let mut depth = 0;
    let mut current = editor.scene().parent(id);
    while let Some(parent) = current {
        depth += 1;
        current = editor.scene().parent(parent);
    }
    depth
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use spoke_node::SceneDocument;
    use spoke_test_utils::{png_bytes, sample_document};

    fn parse(argv: &[&str]) -> (String, ArgMatches) {
        let matches = cli().try_get_matches_from(argv).unwrap();
        let (command, args) = matches.subcommand().unwrap();
        (command.to_string(), args.clone())
    }

    fn scene_arg(args: &ArgMatches) -> PathBuf {
        args.get_one::<PathBuf>("scene").unwrap().clone()
    }

    #[test]
    fn cli_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn commands_require_their_arguments() {
        assert!(cli().try_get_matches_from(["spoke"]).is_err());
        assert!(cli().try_get_matches_from(["spoke", "inspect"]).is_err());
        assert!(cli().try_get_matches_from(["spoke", "resave", "a.json"]).is_err());
        assert!(cli().try_get_matches_from(["spoke", "export", "a.json"]).is_err());
    }

    #[test]
    fn asset_root_defaults_to_scene_directory() {
        let (_, args) = parse(&["spoke", "inspect", "levels/crater.json"]);
        let config = load_config(&args, &scene_arg(&args)).unwrap();
        assert_eq!(config.asset_root, PathBuf::from("levels"));

        let (_, args) = parse(&["spoke", "inspect", "crater.json"]);
        let config = load_config(&args, &scene_arg(&args)).unwrap();
        assert_eq!(config.asset_root, PathBuf::from("."));
    }

    #[test]
    fn assets_flag_overrides_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("spoke.toml");
        std::fs::write(&config_path, "asset_root = \"from-file\"\nlog_level = \"debug\"\n").unwrap();
        let config_arg = config_path.to_str().unwrap();

        let (_, args) = parse(&["spoke", "inspect", "crater.json", "--config", config_arg]);
        let config = load_config(&args, &scene_arg(&args)).unwrap();
        assert_eq!(config.asset_root, PathBuf::from("from-file"));
        assert_eq!(config.log_level, "debug");

        let (_, args) = parse(&[
            "spoke", "--config", config_arg, "inspect", "crater.json", "--assets", "media",
        ]);
        let config = load_config(&args, &scene_arg(&args)).unwrap();
        assert_eq!(config.asset_root, PathBuf::from("media"));
        assert_eq!(config.log_level, "debug");
    }

    fn write_scene(dir: &Path) -> (PathBuf, SceneDocument) {
        std::fs::write(dir.join("wall.png"), png_bytes(64, 32)).unwrap();
        let document = sample_document("wall.png");
        let scene = dir.join("scene.json");
        std::fs::write(&scene, document.to_json_pretty().unwrap()).unwrap();
        (scene, document)
    }

    async fn run_argv(argv: &[&str]) -> anyhow::Result<()> {
        let (command, args) = parse(argv);
        let config = load_config(&args, &scene_arg(&args))?;
        run(&command, &args, config).await
    }

    #[tokio::test]
    async fn resave_writes_equivalent_document() {
        let dir = tempfile::tempdir().unwrap();
        let (scene, document) = write_scene(dir.path());
        let out = dir.path().join("out.json");

        run_argv(&["spoke", "resave", scene.to_str().unwrap(), out.to_str().unwrap()])
            .await
            .unwrap();

        let saved = SceneDocument::from_json(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(saved, document);
    }

    #[tokio::test]
    async fn export_writes_export_components() {
        let dir = tempfile::tempdir().unwrap();
        let (scene, _) = write_scene(dir.path());
        let out = dir.path().join("export.json");

        run_argv(&["spoke", "export", scene.to_str().unwrap(), out.to_str().unwrap()])
            .await
            .unwrap();

        let exported = SceneDocument::from_json(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert!(exported.entities.iter().any(|e| e.has_component("spin")));
        assert!(exported.entities.iter().any(|e| e.has_component("image-mesh")));
    }

    #[tokio::test]
    async fn inspect_loads_scene_and_missing_scene_fails() {
        let dir = tempfile::tempdir().unwrap();
        let (scene, _) = write_scene(dir.path());

        run_argv(&["spoke", "inspect", scene.to_str().unwrap()]).await.unwrap();

        let missing = dir.path().join("missing.json");
        assert!(run_argv(&["spoke", "inspect", missing.to_str().unwrap()]).await.is_err());
    }
}
