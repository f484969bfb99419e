use crate::domain::report::{CourseGradeSheet, Transcript};
use crate::utils::error::Result;
use std::io::Write;
use std::path::Path;

pub fn write_course_grades<W: Write>(sheet: &CourseGradeSheet, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["student_id", "student_name", "grade", "letter_grade"])?;

    for row in &sheet.grades {
        let grade = row.grade.to_string();
        csv_writer.write_record([
            row.student_id.as_str(),
            row.student_name.as_str(),
            grade.as_str(),
            row.letter_grade.as_str(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

pub fn write_transcript<W: Write>(transcript: &Transcript, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record([
        "course_code",
        "course_name",
        "numeric_grade",
        "letter_grade",
        "status",
    ])?;

    for entry in &transcript.courses {
        let numeric_grade = entry.numeric_grade.to_string();
        let status = entry.status.to_string();
        csv_writer.write_record([
            entry.course_code.as_str(),
            entry.course_name.as_str(),
            numeric_grade.as_str(),
            entry.letter_grade.as_str(),
            status.as_str(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

pub fn export_course_grades(sheet: &CourseGradeSheet, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_course_grades(sheet, file)?;
    tracing::info!(
        "📁 Exported {} grades for {} to {}",
        sheet.grades.len(),
        sheet.course_code,
        path.display()
    );
    Ok(())
}

pub fn export_transcript(transcript: &Transcript, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_transcript(transcript, file)?;
    tracing::info!("📁 Exported transcript for {} to {}", transcript.student_id, path.display());
    Ok(())
}
