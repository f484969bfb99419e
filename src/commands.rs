use gradebook::adapters::csv_export;
use gradebook::app::console::render_transcript;
use gradebook::config::cli::{
    Command, CourseCommand, ExportCommand, GradeCommand, ReportCommand, StudentCommand,
};
use gradebook::domain::ports::GradeRepository;
use gradebook::{Console, GradeCategory, GradebookService, Result};
use serde::Serialize;
use std::io::Write;

pub async fn run<R: GradeRepository, W: Write>(
    service: &mut GradebookService<R>,
    command: Command,
    json: bool,
    out: &mut W,
) -> Result<()> {
    match command {
        Command::Console => {
            let stdin = std::io::stdin();
            let mut console = Console::new(stdin.lock(), std::io::stdout());
            console.run(service).await
        }
        Command::Student(StudentCommand::Add { student_id, student_name }) => {
            service.create_student(&student_id, &student_name).await?;
            writeln!(out, "✅ Student {} added successfully!", student_name.trim())?;
            Ok(())
        }
        Command::Student(StudentCommand::List) => {
            if json {
                return print_json(out, &service.students());
            }
            let students = service.students();
            if students.is_empty() {
                writeln!(out, "No students found in the system.")?;
            }
            for student in students {
                writeln!(out, "ID: {}, Name: {}", student.student_id(), student.student_name())?;
            }
            Ok(())
        }
        Command::Student(StudentCommand::Show { student_id }) => {
            let detail = service.student_detail(&student_id)?;
            if json {
                return print_json(out, &detail);
            }
            writeln!(out, "ID: {}", detail.student_id)?;
            writeln!(out, "Name: {}", detail.student_name)?;
            if detail.enrolled_courses.is_empty() {
                writeln!(out, "Not enrolled in any courses.")?;
            }
            for course in &detail.enrolled_courses {
                let grade = match (course.grade, course.letter_grade) {
                    (Some(grade), Some(letter)) => format!("{} ({})", grade, letter),
                    _ => "Not graded".to_string(),
                };
                writeln!(out, "  {}: {} - {}", course.course_code, course.course_name, grade)?;
            }
            Ok(())
        }
        Command::Course(CourseCommand::Add { course_code, course_name }) => {
            service.create_course(&course_code, &course_name).await?;
            writeln!(out, "✅ Course {} added successfully!", course_name.trim())?;
            Ok(())
        }
        Command::Course(CourseCommand::List) => {
            if json {
                return print_json(out, &service.courses());
            }
            let courses = service.courses();
            if courses.is_empty() {
                writeln!(out, "No courses found in the system.")?;
            }
            for course in courses {
                writeln!(out, "Code: {}, Name: {}", course.course_code(), course.course_name())?;
            }
            Ok(())
        }
        Command::Course(CourseCommand::Show { course_code }) => {
            let detail = service.course_detail(&course_code)?;
            if json {
                return print_json(out, &detail);
            }
            writeln!(out, "Code: {}", detail.course_code)?;
            writeln!(out, "Name: {}", detail.course_name)?;
            for student in &detail.students {
                let grade = match (student.grade, student.letter_grade) {
                    (Some(grade), Some(letter)) => format!("{} ({})", grade, letter),
                    _ => "Not graded".to_string(),
                };
                writeln!(out, "  {}: {} - {}", student.student_id, student.student_name, grade)?;
            }
            match detail.average_grade {
                Some(avg) => writeln!(
                    out,
                    "Course Average: {:.2} ({})",
                    avg,
                    GradeCategory::letter_grade(avg)
                )?,
                None => writeln!(out, "No grades available to calculate average.")?,
            }
            Ok(())
        }
        Command::Enroll(args) => {
            service.enroll(&args.student_id, &args.course_code).await?;
            writeln!(out, "✅ Student {} enrolled in {}", args.student_id, args.course_code)?;
            Ok(())
        }
        Command::Grade(GradeCommand::Assign { student_id, course_code, score }) => {
            let letter = service.assign_grade(&student_id, &course_code, score).await?;
            writeln!(out, "✅ Grade {} ({}) assigned successfully", score, letter)?;
            Ok(())
        }
        Command::Grade(GradeCommand::Student { student_id }) => {
            let report = service.student_grades(&student_id)?;
            if json {
                return print_json(out, &report);
            }
            if report.grades.is_empty() {
                writeln!(out, "{} has no grades recorded.", report.student_name)?;
            }
            for row in &report.grades {
                writeln!(
                    out,
                    "{}: {} - {} ({})",
                    row.course_code, row.course_name, row.grade, row.letter_grade
                )?;
            }
            Ok(())
        }
        Command::Grade(GradeCommand::Course { course_code }) => {
            let sheet = service.course_grades(&course_code)?;
            if json {
                return print_json(out, &sheet);
            }
            if sheet.grades.is_empty() {
                writeln!(out, "No grades recorded for {}.", sheet.course_name)?;
            }
            for row in &sheet.grades {
                writeln!(
                    out,
                    "{}: {} - {} ({})",
                    row.student_id, row.student_name, row.grade, row.letter_grade
                )?;
            }
            Ok(())
        }
        Command::Report(ReportCommand::Transcript { student_id }) => {
            let transcript = service.transcript(&student_id)?;
            if json {
                return print_json(out, &transcript);
            }
            render_transcript(out, &transcript)
        }
        Command::Report(ReportCommand::Performance { course_code }) => {
            let report = service.course_performance(&course_code)?;
            if json {
                return print_json(out, &report);
            }
            writeln!(out, "===== PERFORMANCE SUMMARY FOR {} =====", report.course_name)?;
            writeln!(out, "Number of Students: {}", report.num_students)?;
            writeln!(out, "Number Graded: {}", report.num_graded)?;
            match &report.statistics {
                Some(stats) => {
                    writeln!(out, "Average Grade: {:.2}", stats.average_grade)?;
                    writeln!(out, "Highest Grade: {:.2}", stats.highest_grade)?;
                    writeln!(out, "Lowest Grade: {:.2}", stats.lowest_grade)?;
                    writeln!(out, "Pass Rate: {:.2}%", stats.pass_rate)?;
                    for (letter, count) in &stats.grade_distribution {
                        writeln!(out, "  {}: {} student(s)", letter, count)?;
                    }
                }
                None => writeln!(out, "No statistics available.")?,
            }
            Ok(())
        }
        Command::Report(ReportCommand::Compare) => {
            let summaries = service.course_comparison();
            if json {
                return print_json(out, &summaries);
            }
            writeln!(out, "{:<12} {:<30} {:>8} {:>10}", "CODE", "NAME", "AVERAGE", "PASS RATE")?;
            for summary in &summaries {
                let average = summary
                    .average_grade
                    .map(|a| format!("{:.2}", a))
                    .unwrap_or_else(|| "-".to_string());
                let pass_rate = summary
                    .pass_rate
                    .map(|p| format!("{:.2}%", p))
                    .unwrap_or_else(|| "-".to_string());
                writeln!(
                    out,
                    "{:<12} {:<30} {:>8} {:>10}",
                    summary.course_code, summary.course_name, average, pass_rate
                )?;
            }
            Ok(())
        }
        Command::Export(ExportCommand::Course { course_code, output }) => {
            let sheet = service.course_grades(&course_code)?;
            csv_export::export_course_grades(&sheet, &output)?;
            writeln!(out, "📁 Output saved to: {}", output.display())?;
            Ok(())
        }
        Command::Export(ExportCommand::Transcript { student_id, output }) => {
            let transcript = service.transcript(&student_id)?;
            csv_export::export_transcript(&transcript, &output)?;
            writeln!(out, "📁 Output saved to: {}", output.display())?;
            Ok(())
        }
    }
}

fn print_json<T: Serialize + ?Sized, W: Write>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gradebook::JsonFileRepository;
    use tempfile::TempDir;

    async fn run_to_string(
        service: &mut GradebookService<JsonFileRepository>,
        command: Command,
        json: bool,
    ) -> String {
        let mut out = Vec::new();
        run(service, command, json, &mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn test_commands_end_to_end() {
        let temp_dir = TempDir::new().unwrap();
        let repository = JsonFileRepository::new(temp_dir.path().join("grades.json"));
        let mut service = GradebookService::open(repository).await.unwrap();

        let add_student = StudentCommand::Add {
            student_id: "S1".into(),
            student_name: "Ada".into(),
        };
        run_to_string(&mut service, Command::Student(add_student), false).await;
        let add_course = CourseCommand::Add {
            course_code: "X".into(),
            course_name: "Course X".into(),
        };
        run_to_string(&mut service, Command::Course(add_course), false).await;
        let enroll = gradebook::config::cli::EnrollArgs {
            student_id: "S1".into(),
            course_code: "X".into(),
        };
        run_to_string(&mut service, Command::Enroll(enroll), false).await;
        let assigned = run_to_string(
            &mut service,
            Command::Grade(GradeCommand::Assign {
                student_id: "S1".into(),
                course_code: "X".into(),
                score: 72.0,
            }),
            false,
        )
        .await;
        assert!(assigned.contains("Grade 72 (B-) assigned successfully"));

        let transcript_command = Command::Report(ReportCommand::Transcript {
            student_id: "S1".into(),
        });
        let transcript = run_to_string(&mut service, transcript_command, true).await;
        let value: serde_json::Value = serde_json::from_str(&transcript).unwrap();
        assert_eq!(value["gpa"], 4.0);
        assert_eq!(value["courses"][0]["letter_grade"], "B-");

        let compare =
            run_to_string(&mut service, Command::Report(ReportCommand::Compare), false).await;
        assert!(compare.contains("72.00"));
        assert!(compare.contains("100.00%"));
    }

    #[tokio::test]
    async fn test_unknown_ids_are_errors() {
        let temp_dir = TempDir::new().unwrap();
        let repository = JsonFileRepository::new(temp_dir.path().join("grades.json"));
        let mut service = GradebookService::open(repository).await.unwrap();

        let mut out = Vec::new();
        let command = Command::Report(ReportCommand::Performance {
            course_code: "NOPE".into(),
        });
        let result = run(&mut service, command, false, &mut out).await;
        assert_eq!(result.unwrap_err().exit_code(), 1);
    }
}
