use crate::domain::grading::{GradeCategory, LetterGrade};
use crate::domain::manager::GradeManager;
use crate::domain::model::{Course, Student};
use crate::domain::ports::GradeRepository;
use crate::domain::report::{
    CourseGradeSheet, CoursePerformance, CourseSummary, StudentGradeReport, Transcript,
};
use crate::utils::error::{GradebookError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_range};
use indexmap::IndexMap;
use serde::Serialize;

/// A student with their raw grades and the courses they are registered for.
#[derive(Debug, Clone, Serialize)]
pub struct StudentDetail {
    pub student_id: String,
    pub student_name: String,
    pub grades: IndexMap<String, f64>,
    pub enrolled_courses: Vec<EnrolledCourse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnrolledCourse {
    pub course_code: String,
    pub course_name: String,
    pub grade: Option<f64>,
    pub letter_grade: Option<LetterGrade>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CourseDetail {
    pub course_code: String,
    pub course_name: String,
    pub students: Vec<EnrolledStudent>,
    pub average_grade: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnrolledStudent {
    pub student_id: String,
    pub student_name: String,
    pub grade: Option<f64>,
    pub letter_grade: Option<LetterGrade>,
}

/// Load → mutate → save orchestration shared by the console and the CLI.
///
/// The manager is only written back after a mutation succeeded, and a failed
/// reload leaves the current manager in place.
pub struct GradebookService<R: GradeRepository> {
    repository: R,
    manager: GradeManager,
    min_score: f64,
    max_score: f64,
}

impl<R: GradeRepository> GradebookService<R> {
    pub async fn open(repository: R) -> Result<Self> {
        let manager = match repository.load().await? {
            Some(manager) => {
                tracing::info!("📁 Loaded gradebook from {}", repository.location());
                manager
            }
            None => {
                tracing::info!(
                    "Starting with an empty gradebook ({} not found)",
                    repository.location()
                );
                GradeManager::new()
            }
        };
        Ok(Self::with_manager(repository, manager))
    }

    pub fn with_manager(repository: R, manager: GradeManager) -> Self {
        Self {
            repository,
            manager,
            min_score: 0.0,
            max_score: 100.0,
        }
    }

    pub fn with_score_range(mut self, min_score: f64, max_score: f64) -> Self {
        self.min_score = min_score;
        self.max_score = max_score;
        self
    }

    pub fn manager(&self) -> &GradeManager {
        &self.manager
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn score_range(&self) -> (f64, f64) {
        (self.min_score, self.max_score)
    }

    pub async fn save(&self) -> Result<()> {
        self.repository.save(&self.manager).await.map_err(|e| {
            let location = self.repository.location();
            tracing::error!("❌ Failed to save gradebook to {}: {}", location, e);
            e
        })
    }

    /// Replaces the in-memory gradebook with the stored one. Nothing changes on failure.
    pub async fn reload(&mut self) -> Result<()> {
        match self.repository.load().await? {
            Some(manager) => {
                self.manager = manager;
                Ok(())
            }
            None => Err(GradebookError::not_found("Data file", self.repository.location())),
        }
    }

    pub fn replace_manager(&mut self, manager: GradeManager) {
        self.manager = manager;
    }

    pub async fn create_student(&mut self, student_id: &str, student_name: &str) -> Result<()> {
        validate_non_empty_string("student_id", student_id)?;
        validate_non_empty_string("student_name", student_name)?;
        let student_id = student_id.trim();

        if !self.manager.add_student(Student::new(student_id, student_name.trim())) {
            return Err(GradebookError::rejected(format!(
                "Student with ID {} already exists!",
                student_id
            )));
        }
        self.save().await?;
        tracing::info!("✅ Added student {}", student_id);
        Ok(())
    }

    pub async fn create_course(&mut self, course_code: &str, course_name: &str) -> Result<()> {
        validate_non_empty_string("course_code", course_code)?;
        validate_non_empty_string("course_name", course_name)?;
        let course_code = course_code.trim();

        if !self.manager.add_course(Course::new(course_code, course_name.trim())) {
            return Err(GradebookError::rejected(format!(
                "Course with code {} already exists!",
                course_code
            )));
        }
        self.save().await?;
        tracing::info!("✅ Added course {}", course_code);
        Ok(())
    }

    pub async fn enroll(&mut self, student_id: &str, course_code: &str) -> Result<()> {
        let student_id = student_id.trim();
        let course_code = course_code.trim();
        self.require_student(student_id)?;
        self.require_course(course_code)?;

        if !self.manager.register_student_for_course(student_id, course_code) {
            return Err(GradebookError::rejected(format!(
                "Student {} is already registered for {}",
                student_id, course_code
            )));
        }
        self.save().await?;
        tracing::info!("✅ Registered {} for {}", student_id, course_code);
        Ok(())
    }

    pub async fn assign_grade(
        &mut self,
        student_id: &str,
        course_code: &str,
        score: f64,
    ) -> Result<LetterGrade> {
        let student_id = student_id.trim();
        let course_code = course_code.trim();
        validate_range("grade", score, self.min_score, self.max_score)?;
        self.require_student(student_id)?;
        self.require_course(course_code)?;

        if !self.manager.assign_grade(student_id, course_code, score) {
            return Err(GradebookError::rejected(format!(
                "Student {} is not registered for {}",
                student_id, course_code
            )));
        }
        self.save().await?;

        let letter_grade = GradeCategory::letter_grade(score);
        tracing::info!(
            "✅ Grade {} ({}) assigned to {} in {}",
            score, letter_grade, student_id, course_code
        );
        Ok(letter_grade)
    }

    pub fn students(&self) -> Vec<&Student> {
        self.manager.students().collect()
    }

    pub fn courses(&self) -> Vec<&Course> {
        self.manager.courses().collect()
    }

    pub fn student_detail(&self, student_id: &str) -> Result<StudentDetail> {
        let student_id = student_id.trim();
        let student = self.require_student(student_id)?;

        let enrolled_courses = self
            .manager
            .student_courses(student_id)
            .into_iter()
            .map(|course| {
                let grade = student.grade(course.course_code());
                EnrolledCourse {
                    course_code: course.course_code().to_string(),
                    course_name: course.course_name().to_string(),
                    grade,
                    letter_grade: grade.map(GradeCategory::letter_grade),
                }
            })
            .collect();

        Ok(StudentDetail {
            student_id: student.student_id().to_string(),
            student_name: student.student_name().to_string(),
            grades: student.all_grades(),
            enrolled_courses,
        })
    }

    pub fn course_detail(&self, course_code: &str) -> Result<CourseDetail> {
        let course_code = course_code.trim();
        let course = self.require_course(course_code)?;

        let students = self
            .manager
            .course_students(course_code)
            .into_iter()
            .map(|student| {
                let grade = student.grade(course_code);
                EnrolledStudent {
                    student_id: student.student_id().to_string(),
                    student_name: student.student_name().to_string(),
                    grade,
                    letter_grade: grade.map(GradeCategory::letter_grade),
                }
            })
            .collect();

        Ok(CourseDetail {
            course_code: course.course_code().to_string(),
            course_name: course.course_name().to_string(),
            students,
            average_grade: self.manager.course_average(course_code),
        })
    }

    pub fn course_average(&self, course_code: &str) -> Result<Option<f64>> {
        let course_code = course_code.trim();
        self.require_course(course_code)?;
        Ok(self.manager.course_average(course_code))
    }

    pub fn student_grades(&self, student_id: &str) -> Result<StudentGradeReport> {
        let student_id = student_id.trim();
        self.manager
            .student_grade_report(student_id)
            .ok_or_else(|| GradebookError::not_found("Student", student_id))
    }

    pub fn course_grades(&self, course_code: &str) -> Result<CourseGradeSheet> {
        let course_code = course_code.trim();
        self.manager
            .course_grades(course_code)
            .ok_or_else(|| GradebookError::not_found("Course", course_code))
    }

    pub fn transcript(&self, student_id: &str) -> Result<Transcript> {
        let student_id = student_id.trim();
        self.manager
            .student_transcript(student_id)
            .ok_or_else(|| GradebookError::not_found("Student", student_id))
    }

    pub fn course_performance(&self, course_code: &str) -> Result<CoursePerformance> {
        let course_code = course_code.trim();
        self.manager
            .course_performance(course_code)
            .ok_or_else(|| GradebookError::not_found("Course", course_code))
    }

    pub fn course_comparison(&self) -> Vec<CourseSummary> {
        self.manager.course_comparison()
    }

    fn require_student(&self, student_id: &str) -> Result<&Student> {
        self.manager
            .student(student_id)
            .ok_or_else(|| GradebookError::not_found("Student", student_id))
    }

    fn require_course(&self, course_code: &str) -> Result<&Course> {
        self.manager
            .course(course_code)
            .ok_or_else(|| GradebookError::not_found("Course", course_code))
    }
}
