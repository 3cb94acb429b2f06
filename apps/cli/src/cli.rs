use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::config::{MEDICAL_DATABASE_VAR, PII_DATABASE_VAR};

#[derive(Debug, Parser)]
#[command(
    name = "medical_dashboard",
    version,
    about = "Split patient storage and dashboard charts"
)]
pub struct CliArgs {
    /// Override the personal data database path
    #[arg(long = "pii-db", value_name = "PATH", global = true)]
    pub pii_db: Option<String>,

    /// Override the medical database path (empty for local-only mode)
    #[arg(long = "medical-db", value_name = "PATH", global = true)]
    pub medical_db: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create both databases and their schemas
    Init,
    /// Add a patient, splitting personal and medical data
    Add(AddArgs),
    /// List anonymized medical records
    List(OutputArgs),
    /// Show one anonymized medical record
    Show {
        uuid: String,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Show the personal record behind a linking id (backend use only)
    Contact {
        uuid: String,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Replace the age and height of a record
    Edit {
        uuid: String,
        #[arg(long, default_value = "")]
        age: String,
        #[arg(long, default_value = "")]
        height: String,
    },
    /// Delete a patient from both stores
    Delete { uuid: String },
    /// Dump every anonymized document as JSON
    Export,
    /// Audit the separation between the two stores
    Verify(OutputArgs),
    /// Print demo dashboard chart configurations as JSON
    Demo(DemoArgs),
    /// Draw the demo dashboard charts in the terminal
    Preview(DemoArgs),
}

#[derive(Debug, Args)]
pub struct AddArgs {
    #[arg(long = "name")]
    pub full_name: String,
    #[arg(long)]
    pub phone: String,
    #[arg(long)]
    pub email: String,
    #[arg(long, default_value = "")]
    pub age: String,
    #[arg(long, default_value = "")]
    pub height: String,
}

#[derive(Debug, Args, Clone, Copy, Default)]
pub struct OutputArgs {
    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args, Clone, Copy)]
pub struct DemoArgs {
    /// Number of four-week steps
    #[arg(long, default_value_t = medical_dashboard_core::charts::DEFAULT_WEEKS)]
    pub weeks: usize,

    /// Seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(db) = &self.pii_db {
            std::env::set_var(PII_DATABASE_VAR, db);
        }
        if let Some(db) = &self.medical_db {
            std::env::set_var(MEDICAL_DATABASE_VAR, db);
        }
    }

    pub fn help_text() -> String {
        let mut command = Self::command();
        let mut buffer = Vec::new();
        command.write_help(&mut buffer).ok();
        String::from_utf8_lossy(&buffer).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn parses_add_with_global_flags() {
        let args = CliArgs::try_parse_from([
            "medical_dashboard",
            "add",
            "--name",
            "Jane Roe",
            "--phone",
            "555",
            "--email",
            "jane@example.org",
            "--age",
            "29",
            "--medical-db",
            "",
        ])
        .unwrap();

        assert_eq!(args.medical_db.as_deref(), Some(""));
        let Some(Command::Add(add)) = args.command else {
            panic!("expected add");
        };
        assert_eq!(add.full_name, "Jane Roe");
        assert_eq!(add.age, "29");
        assert_eq!(add.height, "");
    }

    #[test]
    fn demo_defaults_to_seven_weeks() {
        let args = CliArgs::try_parse_from(["medical_dashboard", "demo", "--seed", "3"]).unwrap();
        let Some(Command::Demo(demo)) = args.command else {
            panic!("expected demo");
        };
        assert_eq!(demo.weeks, 7);
        assert_eq!(demo.seed, Some(3));
    }

    #[test]
    fn help_mentions_commands() {
        let help = CliArgs::help_text();
        assert!(help.contains("verify"));
        assert!(help.contains("preview"));
    }
}
