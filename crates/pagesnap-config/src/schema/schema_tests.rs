use super::*;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.snapshot.ref_attribute, "aria-ref");
    assert!(config.snapshot.include_frames);
    assert_eq!(config.snapshot.max_frame_depth, 8);
    assert_eq!(config.output.format, "text");
    assert!(!config.output.framed);
    assert_eq!(config.logging.level, "info");
    assert!(!config.logging.file);
}

#[test]
fn test_log_dir_default() {
    let logging = LoggingConfig::default();
    assert!(logging.dir.ends_with(".pagesnap/logs"));
}

#[test]
fn test_partial_section_keeps_defaults() {
    let config: Config = toml::from_str(
        r#"
        [snapshot]
        include_frames = false
        "#,
    )
    .unwrap();
    assert!(!config.snapshot.include_frames);
    assert_eq!(config.snapshot.ref_attribute, "aria-ref");
    assert_eq!(config.output, OutputConfig::default());
}

#[test]
fn test_config_serialization_round_trip() {
    let mut config = Config::default();
    config.output.format = "json".to_string();
    config.logging.file = true;

    let toml_str = toml::to_string(&config).unwrap();
    let parsed: Config = toml::from_str(&toml_str).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn test_output_formats() {
    assert!(OUTPUT_FORMATS.contains(&"text"));
    assert!(OUTPUT_FORMATS.contains(&"json"));
}
