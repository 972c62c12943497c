//! Integration tests for the startup sequence: env files, then documents,
//! then setting resolution.
//!
//! These tests drive the public API the way the CLI does, against real files
//! in a temporary directory and an in-memory environment.

use gpm_config::{
    ConfigDocument, EnvFileLoader, GlobalSettings, Layer, MemoryEnv, SettingResolver, catalog,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

struct Workspace {
    _root: TempDir,
    home: std::path::PathBuf,
    project: std::path::PathBuf,
}

fn workspace() -> Workspace {
    let root = TempDir::new().unwrap();
    let home = root.path().join("home");
    let project = root.path().join("project");
    fs::create_dir_all(&home).unwrap();
    fs::create_dir_all(&project).unwrap();
    Workspace {
        _root: root,
        home,
        project,
    }
}

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

fn startup(ws: &Workspace, environment: &str) -> SettingResolver<MemoryEnv> {
    let mut env = MemoryEnv::new();
    EnvFileLoader::new(&ws.project)
        .with_home_base(&ws.home)
        .with_environment(environment)
        .load(&mut env)
        .expect("env files should load");

    let project = ConfigDocument::discover(&ws.project).expect("project document should parse");
    let global =
        GlobalSettings::load(&ws.home.join("settings.yaml")).expect("global settings should parse");

    SettingResolver::with_env(env)
        .with_project(project)
        .with_global(global)
        .with_environment(environment)
}

/// Full chain: env > scoped project > global > default.
#[test]
fn test_full_precedence_chain() {
    let ws = workspace();
    write(&ws.home, ".env", "GPM_GIT_REMOTE=upstream\n");
    write(
        &ws.project,
        "gpm.yaml",
        "name: svc\nsettings:\n  format:\n    tool: gofumpt\nsettings:prod:\n  ai:\n    model: prod-model\n",
    );
    write(&ws.home, "settings.yaml", "lint:\n  tool: revive\nai:\n  model: global-model\n");

    let r = startup(&ws, "prod");

    let remote = r.resolve_traced("git.remote", "origin".to_string(), "origin".to_string());
    assert_eq!((remote.value.as_str(), remote.layer), ("upstream", Layer::Environment));

    let model = r.resolve_traced("ai.model", "d".to_string(), "d".to_string());
    assert_eq!((model.value.as_str(), model.layer), ("prod-model", Layer::Project));

    // settings:prod replaces the unscoped section, so format.tool is not seen
    let format = r.resolve_traced("format.tool", "gofmt".to_string(), "gofmt".to_string());
    assert_eq!(format.layer, Layer::Default);

    let lint = r.resolve_traced("lint.tool", "x".to_string(), "x".to_string());
    assert_eq!((lint.value.as_str(), lint.layer), ("revive", Layer::Global));
}

#[test]
fn test_env_file_cascade_feeds_resolution() {
    let ws = workspace();
    write(&ws.home, ".env", "GPM_AI_CHAT_TEMPERATURE=0.1\n");
    write(&ws.project, ".env", "GPM_AI_CHAT_TEMPERATURE=0.2\n");
    write(&ws.project, ".env.local", "GPM_AI_CHAT_TEMPERATURE=0.3\n");

    let r = startup(&ws, "");
    assert_eq!(r.resolve("ai.chat.temperature", 0.7_f32, 0.7_f32), 0.3);
}

#[test]
fn test_no_project_document() {
    let ws = workspace();
    let r = startup(&ws, "dev");
    assert!(r.project().is_none());

    let got = catalog::find("format.tool").unwrap().resolve(&r, None);
    assert_eq!((got.value.as_str(), got.layer), ("gofmt", Layer::Default));
}

#[test]
fn test_explicit_flag_wins_over_loaded_env() {
    let ws = workspace();
    write(&ws.project, ".env", "GPM_AI_MODEL=env-model\n");

    let r = startup(&ws, "");
    let got = catalog::find("ai.model").unwrap().resolve(&r, Some("flag-model"));
    assert_eq!((got.value.as_str(), got.layer), ("flag-model", Layer::Flag));
}

#[test]
fn test_effective_files_follow_active_environment() {
    let ws = workspace();
    write(
        &ws.project,
        "gpm.yaml",
        "name: svc\nfiles: [\"*.go\"]\nfiles:prod: [\"cmd/**\", \"go.mod\"]\n",
    );

    let prod = startup(&ws, "prod");
    assert_eq!(
        prod.project().unwrap().effective_files(prod.environment()),
        vec!["cmd/**".to_string(), "go.mod".to_string()]
    );

    let dev = startup(&ws, "dev");
    assert_eq!(
        dev.project().unwrap().effective_files(dev.environment()),
        vec!["*.go".to_string()]
    );
}
