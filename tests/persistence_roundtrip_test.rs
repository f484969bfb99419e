use anyhow::Result;
use gradebook::domain::ports::GradeRepository;
use gradebook::{Course, GradeManager, JsonFileRepository, Student};
use tempfile::TempDir;

fn populated_manager() -> GradeManager {
    let mut manager = GradeManager::new();
    for (id, name) in [("S3", "Cy"), ("S1", "Ada"), ("S2", "Bob")] {
        assert!(manager.add_student(Student::new(id, name)));
    }
    for (code, name) in [("PH100", "Physics"), ("CS101", "Programming"), ("MA201", "Calculus")] {
        assert!(manager.add_course(Course::new(code, name)));
    }
    for (id, code) in [("S2", "CS101"), ("S3", "CS101"), ("S1", "CS101"), ("S1", "MA201")] {
        assert!(manager.register_student_for_course(id, code));
    }
    manager.assign_grade("S1", "MA201", 64.0);
    manager.assign_grade("S1", "CS101", 39.5);
    manager.assign_grade("S3", "CS101", 100.0);
    manager
}

#[tokio::test]
async fn test_save_then_load_reproduces_the_gradebook() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let repository = JsonFileRepository::new(temp_dir.path().join("grade_data.json"));
    let manager = populated_manager();

    repository.save(&manager).await?;
    let loaded = repository.load().await?.expect("document was just saved");

    assert_eq!(loaded, manager);
    assert_eq!(loaded.enrollment_ids("CS101"), ["S2", "S3", "S1"]);
    assert!(loaded.enrollment_ids("PH100").is_empty());

    let student_order: Vec<&str> = loaded.students().map(|s| s.student_id()).collect();
    assert_eq!(student_order, vec!["S3", "S1", "S2"]);

    // derived values are identical after the round trip
    assert_eq!(loaded.student_transcript("S1"), manager.student_transcript("S1"));
    assert_eq!(loaded.course_performance("CS101"), manager.course_performance("CS101"));
    Ok(())
}

#[tokio::test]
async fn test_document_written_by_hand_loads() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("legacy.json");
    let document = r#"{
    "students": {
        "S1": {"student_id": "S1", "student_name": "Ada", "grades": {"CS101": 82.0, "OLD999": 12.0}}
    },
    "courses": {
        "CS101": {"course_code": "CS101", "course_name": "Programming"}
    },
    "enrollments": {
        "CS101": ["S1", "S404"]
    }
}"#;
    tokio::fs::write(&path, document).await?;

    let manager = JsonFileRepository::new(&path).load().await?.expect("file exists");

    let transcript = manager.student_transcript("S1").expect("student exists");
    assert_eq!(transcript.total_courses, 1);
    assert_eq!(transcript.gpa, 5.0);

    let students = manager.course_students("CS101");
    assert_eq!(students.len(), 1);
    assert_eq!(manager.course_average("CS101"), Some(82.0));
    Ok(())
}

#[tokio::test]
async fn test_overwriting_keeps_the_latest_snapshot() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let repository = JsonFileRepository::new(temp_dir.path().join("grade_data.json"));

    let mut manager = populated_manager();
    repository.save(&manager).await?;
    manager.add_student(Student::new("S4", "Di"));
    repository.save(&manager).await?;

    let loaded = repository.load().await?.expect("saved twice");
    assert!(loaded.student("S4").is_some());
    assert_eq!(loaded.students().count(), 4);
    Ok(())
}
