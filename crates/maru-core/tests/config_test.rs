use maru_core::{Error, Flavor, FlavorParams, ProjectConfig, PythonCondaParams, TOOL_VERSION};
use tempfile::TempDir;

#[test]
fn load_returns_none_when_no_config_file() {
    let tmp = TempDir::new().unwrap();
    let path = ProjectConfig::default_path(tmp.path());
    assert!(ProjectConfig::load(&path).unwrap().is_none());
}

#[test]
fn load_mandatory_reports_absent_config() {
    let tmp = TempDir::new().unwrap();
    let path = ProjectConfig::default_path(tmp.path());
    let err = ProjectConfig::load_mandatory(&path).unwrap_err();
    assert!(matches!(err, Error::ConfigAbsent(_)));
    assert!(err.to_string().contains("maru init"));
}

#[test]
fn load_parses_full_config() {
    let tmp = TempDir::new().unwrap();
    let yaml = r#"
maru_version: 0.1.0
name: segmenter
version: $git_tag
remotes:
  - docker.io/acme
  - ghcr.io/acme
build_args:
  GIT_TAG: v1.2.0
  REF: $version
build_repo_url: https://github.com/acme/segmenter.git
flavor:
  name: python_conda
  python_version: '3.7'
  dependencies: numpy=1.19 h5py
  script_path: main.py
"#;
    let path = ProjectConfig::default_path(tmp.path());
    std::fs::write(&path, yaml).unwrap();

    let config = ProjectConfig::load_mandatory(&path).unwrap();

    assert_eq!(config.tool_version, "0.1.0");
    assert_eq!(config.name, "segmenter");
    assert_eq!(config.remotes, vec!["docker.io/acme", "ghcr.io/acme"]);
    assert_eq!(config.resolve_version(), "v1.2.0");
    // `$version` expands first, and its `$git_tag` is then substituted.
    assert_eq!(config.resolve_build_arg("REF").as_deref(), Some("v1.2.0"));
    assert_eq!(config.image_ref(), "segmenter:v1.2.0");
    assert_eq!(
        config.flavor,
        FlavorParams::PythonConda(PythonCondaParams {
            python_version: "3.7".to_owned(),
            dependencies: "numpy=1.19 h5py".to_owned(),
            script_path: "main.py".to_owned(),
        })
    );
}

#[test]
fn load_rejects_malformed_yaml() {
    let tmp = TempDir::new().unwrap();
    let path = ProjectConfig::default_path(tmp.path());
    std::fs::write(&path, "name: [unclosed\n").unwrap();
    let err = ProjectConfig::load(&path).unwrap_err();
    assert!(matches!(err, Error::ConfigParse { .. }));
}

#[test]
fn load_rejects_unknown_flavor_tag() {
    let tmp = TempDir::new().unwrap();
    let path = ProjectConfig::default_path(tmp.path());
    std::fs::write(&path, "name: a\nversion: '1'\nflavor:\n  name: cobol\n").unwrap();
    assert!(matches!(
        ProjectConfig::load(&path),
        Err(Error::ConfigParse { .. })
    ));
}

#[test]
fn save_stamps_tool_version_and_round_trips() {
    let tmp = TempDir::new().unwrap();
    let path = ProjectConfig::default_path(tmp.path());

    let mut config = ProjectConfig {
        tool_version: "0.0.1".to_owned(),
        name: "tool".to_owned(),
        version: "1.0.0".to_owned(),
        remotes: vec!["docker.io/acme".to_owned()],
        build_repo_url: "https://github.com/acme/tool.git".to_owned(),
        flavor: Flavor::FijiMacro.defaults().unwrap(),
        ..Default::default()
    };
    config.set_git_tag("v1");
    config.save(&path).unwrap();

    let loaded = ProjectConfig::load_mandatory(&path).unwrap();
    assert_eq!(loaded.tool_version, TOOL_VERSION);
    assert_eq!(loaded, config);
}

#[test]
fn save_overwrites_existing_file() {
    let tmp = TempDir::new().unwrap();
    let path = ProjectConfig::default_path(tmp.path());
    std::fs::write(&path, "garbage: [").unwrap();

    let mut config = ProjectConfig {
        name: "tool".to_owned(),
        version: "1.0.0".to_owned(),
        ..Default::default()
    };
    config.save(&path).unwrap();

    let loaded = ProjectConfig::load_mandatory(&path).unwrap();
    assert_eq!(loaded.name, "tool");
    assert_eq!(loaded.flavor, FlavorParams::Custom);
}

#[test]
fn save_into_missing_directory_fails() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("nope").join("maru.yaml");
    let mut config = ProjectConfig::default();
    assert!(matches!(
        config.save(&path),
        Err(Error::ConfigWrite { .. })
    ));
}
