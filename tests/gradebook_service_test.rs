use anyhow::Result;
use gradebook::adapters::csv_export;
use gradebook::{GradebookError, GradebookService, JsonFileRepository, LetterGrade};
use tempfile::TempDir;

async fn open_service(temp_dir: &TempDir) -> Result<GradebookService<JsonFileRepository>> {
    let repository = JsonFileRepository::new(temp_dir.path().join("data").join("grade_data.json"));
    Ok(GradebookService::open(repository).await?)
}

#[tokio::test]
async fn test_changes_survive_reopening() -> Result<()> {
    let temp_dir = TempDir::new()?;

    {
        let mut service = open_service(&temp_dir).await?;
        service.create_student("S1", "Ada").await?;
        service.create_student("S2", "Bob").await?;
        service.create_course("X", "Course X").await?;
        service.create_course("Y", "Course Y").await?;
        service.enroll("S1", "X").await?;
        service.enroll("S1", "Y").await?;
        service.enroll("S2", "X").await?;
        assert_eq!(service.assign_grade("S1", "X", 90.0).await?, LetterGrade::A);
        assert_eq!(service.assign_grade("S1", "Y", 30.0).await?, LetterGrade::F);
    }

    let service = open_service(&temp_dir).await?;

    let transcript = service.transcript("S1")?;
    assert_eq!(transcript.total_courses, 2);
    assert_eq!(transcript.passed_courses, 1);
    assert_eq!(transcript.gpa, 2.5);

    // S2 is enrolled but ungraded, so the average only covers S1
    assert_eq!(service.course_average("X")?, Some(90.0));

    let performance = service.course_performance("X")?;
    assert_eq!(performance.num_students, 2);
    assert_eq!(performance.num_graded, 1);
    Ok(())
}

#[tokio::test]
async fn test_rejections_do_not_change_the_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut service = open_service(&temp_dir).await?;
    service.create_student("S1", "Ada").await?;
    service.create_course("X", "Course X").await?;

    let path = service.repository().file_path().to_path_buf();
    let before = tokio::fs::read_to_string(&path).await?;

    assert!(matches!(
        service.create_student("S1", "Someone Else").await,
        Err(GradebookError::Rejected { .. })
    ));
    assert!(matches!(
        service.assign_grade("S1", "X", 70.0).await,
        Err(GradebookError::Rejected { .. })
    ));
    assert!(matches!(
        service.enroll("S1", "Z").await,
        Err(GradebookError::NotFound { entity: "Course", .. })
    ));

    let after = tokio::fs::read_to_string(&path).await?;
    assert_eq!(before, after);
    assert_eq!(service.manager().student("S1").unwrap().student_name(), "Ada");
    Ok(())
}

#[tokio::test]
async fn test_reload_after_external_edit() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut service = open_service(&temp_dir).await?;
    service.create_student("S1", "Ada").await?;

    let path = service.repository().file_path().to_path_buf();
    tokio::fs::write(&path, "not json at all").await?;

    assert!(service.reload().await.is_err());
    assert!(service.manager().student("S1").is_some());
    Ok(())
}

#[tokio::test]
async fn test_csv_exports() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut service = open_service(&temp_dir).await?;
    service.create_student("S1", "Ada").await?;
    service.create_student("S2", "Bob").await?;
    service.create_course("X", "Course X").await?;
    service.enroll("S2", "X").await?;
    service.enroll("S1", "X").await?;
    service.assign_grade("S1", "X", 55.0).await?;
    service.assign_grade("S2", "X", 75.0).await?;

    let sheet_path = temp_dir.path().join("x.csv");
    csv_export::export_course_grades(&service.course_grades("X")?, &sheet_path)?;
    let sheet = std::fs::read_to_string(&sheet_path)?;
    assert_eq!(
        sheet,
        "student_id,student_name,grade,letter_grade\nS2,Bob,75,B+\nS1,Ada,55,C-\n"
    );

    let transcript_path = temp_dir.path().join("s1.csv");
    csv_export::export_transcript(&service.transcript("S1")?, &transcript_path)?;
    let transcript = std::fs::read_to_string(&transcript_path)?;
    assert!(transcript.ends_with("X,Course X,55,C-,PASS\n"));
    Ok(())
}
