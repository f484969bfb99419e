use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "gradebook")]
#[command(about = "Track students, courses, enrollments and grades")]
pub struct CliConfig {
    /// JSON data file (overrides storage.data_file from the config file)
    #[arg(long, global = true)]
    pub data_file: Option<PathBuf>,

    /// TOML configuration file (defaults to ./gradebook.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Print reports as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Start the interactive menu
    Console,
    #[command(subcommand)]
    Student(StudentCommand),
    #[command(subcommand)]
    Course(CourseCommand),
    /// Register a student for a course
    Enroll(EnrollArgs),
    #[command(subcommand)]
    Grade(GradeCommand),
    #[command(subcommand)]
    Report(ReportCommand),
    #[command(subcommand)]
    Export(ExportCommand),
}

#[derive(Debug, Clone, Subcommand)]
pub enum StudentCommand {
    Add { student_id: String, student_name: String },
    List,
    Show { student_id: String },
}

#[derive(Debug, Clone, Subcommand)]
pub enum CourseCommand {
    Add { course_code: String, course_name: String },
    List,
    Show { course_code: String },
}

#[derive(Debug, Clone, Args)]
pub struct EnrollArgs {
    pub student_id: String,
    pub course_code: String,
}

#[derive(Debug, Clone, Subcommand)]
pub enum GradeCommand {
    Assign {
        student_id: String,
        course_code: String,
        #[arg(allow_negative_numbers = true)]
        score: f64,
    },
    /// All grades recorded for a student
    Student { student_id: String },
    /// All grades recorded in a course
    Course { course_code: String },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ReportCommand {
    Transcript { student_id: String },
    Performance { course_code: String },
    /// Average grade and pass rate of every course
    Compare,
}

#[derive(Debug, Clone, Subcommand)]
pub enum ExportCommand {
    Course { course_code: String, output: PathBuf },
    Transcript { student_id: String, output: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_grade_assign() {
        let config = CliConfig::parse_from([
            "gradebook",
            "--data-file",
            "data.json",
            "grade",
            "assign",
            "S1",
            "CS101",
            "87.5",
        ]);

        assert_eq!(config.data_file, Some(PathBuf::from("data.json")));
        match config.command {
            Some(Command::Grade(GradeCommand::Assign {
                ref student_id,
                ref course_code,
                score,
            })) => {
                assert_eq!(student_id, "S1");
                assert_eq!(course_code, "CS101");
                assert_eq!(score, 87.5);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_no_subcommand_means_console() {
        let config = CliConfig::parse_from(["gradebook", "-v"]);
        assert!(config.verbose);
        assert!(config.command.is_none());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let config = CliConfig::parse_from(["gradebook", "report", "transcript", "S1", "--json"]);
        assert!(config.json);
        assert!(matches!(config.command, Some(Command::Report(ReportCommand::Transcript { .. }))));
    }

    #[test]
    fn test_missing_arguments_are_rejected() {
        assert!(CliConfig::try_parse_from(["gradebook", "enroll", "S1"]).is_err());
        let bad_score = ["gradebook", "grade", "assign", "S1", "CS101", "high"];
        assert!(CliConfig::try_parse_from(bad_score).is_err());
    }
}
