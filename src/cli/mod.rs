use circom_bridge::{Binding, VerifierFormat};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

pub mod config;
pub mod logging;
pub mod prove;
pub mod setup;
pub mod verify;
pub mod version;

use config::{default_config_path, BridgeConfig};

const DEFAULT_CIRCUIT: &str = "circuit.circom";
const DEFAULT_PROVING_KEY: &str = "proving.key";
const DEFAULT_INPUT: &str = "input.json";
const DEFAULT_PROOF: &str = "proof.json";
const DEFAULT_VERIFYING_KEY: &str = "verifier.json";

#[derive(Parser)]
#[command(name = "circom-bridge")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Setup, prove and verify with the circom proving engine", long_about = None)]
pub struct Cli {
    /// Path to config file (default: ~/.config/circom-bridge/config.toml)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Result/error buffer capacity in bytes (overrides config)
    #[arg(long, global = true)]
    pub max_buffer: Option<usize>,

    /// Turn on engine logging (overrides config)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile a circuit and generate the proving and verifying keys
    Setup {
        /// Circuit source file
        #[arg(long, default_value = DEFAULT_CIRCUIT)]
        circuit: String,

        /// Where the engine writes the proving key
        #[arg(long, default_value = DEFAULT_PROVING_KEY)]
        pk: String,

        /// Verifying key format: json or solidity (default from config)
        #[arg(long)]
        format: Option<VerifierFormat>,

        /// Write the verifying key here instead of stdout
        #[arg(long)]
        out: Option<String>,
    },

    /// Generate a proof for a set of witness inputs
    Prove {
        /// Circuit source file
        #[arg(long, default_value = DEFAULT_CIRCUIT)]
        circuit: String,

        /// Proving key produced by setup
        #[arg(long, default_value = DEFAULT_PROVING_KEY)]
        pk: String,

        /// JSON object of signal name to value
        #[arg(long, default_value = DEFAULT_INPUT)]
        input: String,

        /// Write the proof here instead of stdout
        #[arg(long)]
        out: Option<String>,
    },

    /// Verify a proof against a verifying key
    Verify {
        /// Verifying key produced by setup (json format)
        #[arg(long, default_value = DEFAULT_VERIFYING_KEY)]
        vk: String,

        /// Proof with public inputs produced by prove
        #[arg(long, default_value = DEFAULT_PROOF)]
        proof: String,
    },

    /// Write a default config file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Display version information
    Version,
}

/// Settings after applying command-line overrides to the config file
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub config: BridgeConfig,
    pub config_path: PathBuf,
}

impl Settings {
    /// Config file location from `--config`, or the default path.
    pub fn config_path(cli: &Cli) -> PathBuf {
        cli.config
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(default_config_path)
    }

    pub fn resolve(cli: &Cli) -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = Self::config_path(cli);

        let mut config = BridgeConfig::load_or_default(&config_path)?;
        if let Some(max_buffer) = cli.max_buffer {
            config.engine.max_buffer = max_buffer;
        }
        if cli.verbose {
            config.engine.verbose = true;
        }

        Ok(Self {
            config,
            config_path,
        })
    }
}

/// Write an artifact, creating parent directories as needed
pub(crate) fn write_artifact(path: &Path, contents: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create directory '{}': {}", parent.display(), e))?;
        }
    }
    fs::write(path, contents)
        .map_err(|e| format!("Failed to write '{}': {}", path.display(), e))?;
    Ok(())
}

pub fn execute(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    // Neither of these reads the config, so a broken file can still be replaced.
    match cli.command {
        Commands::Version => {
            version::execute();
            return Ok(());
        }
        Commands::InitConfig { force } => {
            return init_config(&Settings::config_path(&cli), force);
        }
        _ => {}
    }

    let settings = Settings::resolve(&cli)?;
    logging::init(&settings.config.logging)?;

    let engine = &settings.config.engine;
    let binding = Binding::native()?;
    binding.verbose(engine.verbose);

    match cli.command {
        Commands::Setup {
            circuit,
            pk,
            format,
            out,
        } => setup::execute(
            &binding,
            Path::new(&circuit),
            Path::new(&pk),
            format.unwrap_or(engine.verifier_format),
            out.as_deref().map(Path::new),
            engine.max_buffer,
        ),
        Commands::Prove {
            circuit,
            pk,
            input,
            out,
        } => prove::execute(
            &binding,
            Path::new(&circuit),
            Path::new(&pk),
            Path::new(&input),
            out.as_deref().map(Path::new),
            engine.max_buffer,
        ),
        Commands::Verify { vk, proof } => verify::execute(
            &binding,
            Path::new(&vk),
            Path::new(&proof),
            engine.max_buffer,
        ),
        Commands::InitConfig { .. } | Commands::Version => Ok(()),
    }
}

fn init_config(path: &Path, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    if path.exists() && !force {
        return Err(format!(
            "Config file '{}' already exists (use --force to overwrite)",
            path.display()
        )
        .into());
    }
    BridgeConfig::create_default(path)?;
    println!("📝 Created: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_cli_parse_setup_defaults() {
        let cli = Cli::parse_from(["circom-bridge", "setup"]);

        match cli.command {
            Commands::Setup {
                circuit,
                pk,
                format,
                out,
            } => {
                assert_eq!(circuit, "circuit.circom");
                assert_eq!(pk, "proving.key");
                assert_eq!(format, None);
                assert_eq!(out, None);
            }
            _ => panic!("Expected Setup command"),
        }
        assert!(!cli.verbose);
        assert_eq!(cli.max_buffer, None);
    }

    #[test]
    fn test_cli_parse_setup_with_all_options() {
        let cli = Cli::parse_from([
            "circom-bridge",
            "setup",
            "--circuit",
            "/tmp/circuit.circom",
            "--pk",
            "/tmp/proving.key",
            "--format",
            "solidity",
            "--out",
            "/tmp/verifier.sol",
            "--max-buffer",
            "4000",
            "-v",
        ]);

        match cli.command {
            Commands::Setup {
                circuit,
                pk,
                format,
                out,
            } => {
                assert_eq!(circuit, "/tmp/circuit.circom");
                assert_eq!(pk, "/tmp/proving.key");
                assert_eq!(format, Some(VerifierFormat::Solidity));
                assert_eq!(out, Some("/tmp/verifier.sol".to_string()));
            }
            _ => panic!("Expected Setup command"),
        }
        assert!(cli.verbose);
        assert_eq!(cli.max_buffer, Some(4000));
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        let result = Cli::try_parse_from(["circom-bridge", "setup", "--format", "abi"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_prove() {
        let cli = Cli::parse_from(["circom-bridge", "prove", "--input", "witness.json"]);

        match cli.command {
            Commands::Prove {
                circuit,
                pk,
                input,
                out,
            } => {
                assert_eq!(circuit, "circuit.circom");
                assert_eq!(pk, "proving.key");
                assert_eq!(input, "witness.json");
                assert_eq!(out, None);
            }
            _ => panic!("Expected Prove command"),
        }
    }

    #[test]
    fn test_cli_parse_verify() {
        let cli = Cli::parse_from(["circom-bridge", "verify", "--proof", "p.json"]);

        match cli.command {
            Commands::Verify { vk, proof } => {
                assert_eq!(vk, "verifier.json");
                assert_eq!(proof, "p.json");
            }
            _ => panic!("Expected Verify command"),
        }
    }

    #[test]
    fn test_cli_parse_version() {
        let cli = Cli::parse_from(["circom-bridge", "version"]);
        assert!(matches!(cli.command, Commands::Version));
    }

    #[test]
    fn test_settings_overrides() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[engine]\nmax_buffer = 100\nverbose = false\n").unwrap();

        let config_arg = config_path.to_str().unwrap();
        let cli = Cli::parse_from(["circom-bridge", "--config", config_arg, "version"]);
        let settings = Settings::resolve(&cli).unwrap();
        assert_eq!(settings.config.engine.max_buffer, 100);
        assert!(!settings.config.engine.verbose);

        let cli = Cli::parse_from([
            "circom-bridge",
            "--config",
            config_arg,
            "--max-buffer",
            "9000",
            "--verbose",
            "version",
        ]);
        let settings = Settings::resolve(&cli).unwrap();
        assert_eq!(settings.config.engine.max_buffer, 9000);
        assert!(settings.config.engine.verbose);
        assert_eq!(settings.config_path, config_path);
    }

    #[test]
    fn test_init_config_refuses_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        init_config(&config_path, false).unwrap();
        assert!(config_path.exists());

        let err = init_config(&config_path, false).unwrap_err();
        assert!(err.to_string().contains("already exists"));

        init_config(&config_path, true).unwrap();
    }

    #[test]
    fn test_init_config_force_replaces_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[engine\nmax_buffer = ").unwrap();

        let config_arg = config_path.to_str().unwrap();
        let cli = Cli::parse_from(["circom-bridge", "--config", config_arg, "init-config", "--force"]);
        execute(cli).unwrap();

        let config = BridgeConfig::load(&config_path).unwrap();
        assert_eq!(config, BridgeConfig::default());
    }

    #[test]
    fn test_version_ignores_malformed_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[engine\nmax_buffer = ").unwrap();

        let config_arg = config_path.to_str().unwrap();
        let cli = Cli::parse_from(["circom-bridge", "--config", config_arg, "version"]);
        assert!(Settings::resolve(&cli).is_err());
        execute(cli).unwrap();
    }

    #[test]
    fn test_write_artifact_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("keys").join("verifier.json");
        write_artifact(&path, "{}").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    }
}
