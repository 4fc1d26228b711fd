#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::PathBuf;

    use clap::Parser;
    use tempfile::NamedTempFile;
    use BookBlaster::config::batch::{DEFAULT_INPUT_GLOB, DEFAULT_LD_MODEL_URL};
    use BookBlaster::config::{load_batch_config, Args, BatchConfig};
    use BookBlaster::error::PipelineError;
    use BookBlaster::pipeline::language::DetectorBackend;

    // Helper to create a temporary config file with given content
    fn create_temp_config_file(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
        writeln!(temp_file, "{}", content).expect("Failed to write to temp file");
        temp_file
    }

    #[test]
    fn test_load_valid_config() {
        let yaml_content = r#"
input: "books/**/*.fb2"
output_dir: converted
force: true
workers: 3
language:
  backend: whatlang
  model_path: /opt/models/lid.176.ftz
  model_url: ""
  fetch: false
        "#;
        let temp_file = create_temp_config_file(yaml_content);
        let config = load_batch_config(temp_file.path()).expect("Should load valid config");

        assert_eq!(config.input, "books/**/*.fb2");
        assert_eq!(config.output_dir, PathBuf::from("converted"));
        assert!(config.force);
        assert_eq!(config.workers, Some(3));
        assert_eq!(config.language.backend, DetectorBackend::Whatlang);
        assert_eq!(config.language.model_path, PathBuf::from("/opt/models/lid.176.ftz"));
        assert!(!config.language.fetch);
        assert!(config.language.remote_source().is_none());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let temp_file = create_temp_config_file("{}");
        let config = load_batch_config(temp_file.path()).unwrap();
        assert_eq!(config, BatchConfig::default());
        assert_eq!(config.input, DEFAULT_INPUT_GLOB);
        assert_eq!(config.language.remote_source(), Some(DEFAULT_LD_MODEL_URL));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_batch_config("non_existent_config.yaml");
        match result.err().unwrap() {
            PipelineError::ConfigError(msg) => {
                assert!(msg.contains("Failed to read batch config file"));
                assert!(msg.contains("non_existent_config.yaml"));
            }
            other => panic!("Expected ConfigError for non-existent file, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let temp_file = create_temp_config_file("outptu_dir: typo");
        match load_batch_config(temp_file.path()).err().unwrap() {
            PipelineError::ConfigError(msg) => {
                assert!(msg.contains("Failed to parse batch config YAML"))
            }
            other => panic!("Expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn test_validation_rejects_zero_workers() {
        let config = BatchConfig {
            workers: Some(0),
            ..BatchConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PipelineError::ConfigValidationError(_))
        ));
    }

    #[test]
    fn test_validation_rejects_empty_input() {
        let config = BatchConfig {
            input: "  ".to_string(),
            ..BatchConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_worker_count_defaults_to_parallelism() {
        let config = BatchConfig::default();
        assert!(config.worker_count() >= 1);
        let fixed = BatchConfig {
            workers: Some(5),
            ..BatchConfig::default()
        };
        assert_eq!(fixed.worker_count(), 5);
    }

    #[test]
    fn test_cli_positionals_and_flags() {
        let args = Args::parse_from([
            "book-blaster",
            "data/*.fb2",
            "out",
            "--force",
            "-j",
            "2",
            "--detector",
            "whatlang",
            "--ld-model-path",
            "m/lid.bin",
            "--no-fetch",
        ]);
        let config = args.resolve().unwrap();
        assert_eq!(config.input, "data/*.fb2");
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert!(config.force);
        assert_eq!(config.workers, Some(2));
        assert_eq!(config.language.backend, DetectorBackend::Whatlang);
        assert_eq!(config.language.model_path, PathBuf::from("m/lid.bin"));
        assert!(!config.language.fetch);
    }

    #[test]
    fn test_cli_overrides_config_file() {
        let temp_file = create_temp_config_file("output_dir: from_file\nworkers: 8\nforce: false");
        let args = Args::parse_from([
            "book-blaster",
            "--config",
            temp_file.path().to_str().unwrap(),
            "--workers",
            "1",
        ]);
        let config = args.resolve().unwrap();
        assert_eq!(config.output_dir, PathBuf::from("from_file"));
        assert_eq!(config.workers, Some(1));
        assert!(!config.force);
    }

    #[test]
    fn test_empty_model_url_disables_fetch() {
        let args = Args::parse_from(["book-blaster", "--ld-model-url", ""]);
        let config = args.resolve().unwrap();
        assert_eq!(config.language.model_url, None);
        assert!(config.language.remote_source().is_none());
    }

    #[test]
    fn test_cli_zero_workers_fails_validation() {
        let args = Args::parse_from(["book-blaster", "-j", "0"]);
        assert!(matches!(
            args.resolve(),
            Err(PipelineError::ConfigValidationError(_))
        ));
    }
}
