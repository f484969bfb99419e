use crate::domain::grading::{GradeCategory, LetterGrade};
use crate::domain::model::{Course, Student};
use crate::domain::report::{
    round2, CourseGradeRow, CourseGradeSheet, CoursePerformance, CourseStatistics, CourseSummary,
    GradeStatus, StudentGradeReport, StudentGradeRow, Transcript, TranscriptEntry,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Owns every student and course plus the course → students enrollment lists.
///
/// All cross-entity changes go through this type. Rejected operations return
/// `false`/`None` and leave the state untouched. Enrollment lists and student
/// grades are two separate relations; ids that no longer resolve in either
/// are skipped on read instead of being repaired.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "GradeDocument")]
pub struct GradeManager {
    students: IndexMap<String, Student>,
    courses: IndexMap<String, Course>,
    enrollments: IndexMap<String, Vec<String>>,
}

/// On-disk shape. Every section is optional so partial documents still load.
#[derive(Deserialize)]
struct GradeDocument {
    #[serde(default)]
    students: IndexMap<String, Student>,
    #[serde(default)]
    courses: IndexMap<String, Course>,
    #[serde(default)]
    enrollments: IndexMap<String, Vec<String>>,
}

impl From<GradeDocument> for GradeManager {
    fn from(document: GradeDocument) -> Self {
        let mut manager = GradeManager::new();

        // entities are keyed by their own ids, not by the document keys
        for course in document.courses.into_values() {
            manager
                .courses
                .insert(course.course_code().to_string(), course);
        }
        for student in document.students.into_values() {
            manager
                .students
                .insert(student.student_id().to_string(), student);
        }

        manager.enrollments = document.enrollments;
        for code in manager.courses.keys() {
            if !manager.enrollments.contains_key(code) {
                manager.enrollments.insert(code.clone(), Vec::new());
            }
        }

        manager
    }
}

impl GradeManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_student(&mut self, student: Student) -> bool {
        if self.students.contains_key(student.student_id()) {
            tracing::debug!("Rejected student {}: ID already exists", student.student_id());
            return false;
        }

        self.students
            .insert(student.student_id().to_string(), student);
        true
    }

    pub fn add_course(&mut self, course: Course) -> bool {
        if self.courses.contains_key(course.course_code()) {
            tracing::debug!("Rejected course {}: code already exists", course.course_code());
            return false;
        }

        let code = course.course_code().to_string();
        self.enrollments.insert(code.clone(), Vec::new());
        self.courses.insert(code, course);
        true
    }

    pub fn student(&self, student_id: &str) -> Option<&Student> {
        self.students.get(student_id)
    }

    pub fn course(&self, course_code: &str) -> Option<&Course> {
        self.courses.get(course_code)
    }

    pub fn students(&self) -> impl Iterator<Item = &Student> {
        self.students.values()
    }

    pub fn courses(&self) -> impl Iterator<Item = &Course> {
        self.courses.values()
    }

    /// Raw enrollment ids, including any that no longer resolve to a student.
    pub fn enrollment_ids(&self, course_code: &str) -> &[String] {
        self.enrollments
            .get(course_code)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_enrolled(&self, student_id: &str, course_code: &str) -> bool {
        self.enrollment_ids(course_code)
            .iter()
            .any(|id| id == student_id)
    }

    pub fn register_student_for_course(&mut self, student_id: &str, course_code: &str) -> bool {
        if !self.students.contains_key(student_id) || !self.courses.contains_key(course_code) {
            tracing::debug!(
                "Rejected registration of {} for {}: unknown student or course",
                student_id,
                course_code
            );
            return false;
        }
        if self.is_enrolled(student_id, course_code) {
            tracing::debug!(
                "Rejected registration of {} for {}: already enrolled",
                student_id,
                course_code
            );
            return false;
        }

        self.enrollments
            .entry(course_code.to_string())
            .or_default()
            .push(student_id.to_string());
        true
    }

    pub fn assign_grade(&mut self, student_id: &str, course_code: &str, score: f64) -> bool {
        if !self.courses.contains_key(course_code) || !self.is_enrolled(student_id, course_code) {
            tracing::debug!(
                "Rejected grade for {} in {}: unknown course or not enrolled",
                student_id,
                course_code
            );
            return false;
        }

        match self.students.get_mut(student_id) {
            Some(student) => {
                student.add_grade(course_code, score);
                true
            }
            None => {
                tracing::debug!("Rejected grade for {}: unknown student", student_id);
                false
            }
        }
    }

    pub fn student_grades(&self, student_id: &str) -> Option<IndexMap<String, f64>> {
        self.students.get(student_id).map(Student::all_grades)
    }

    /// Enrolled students in registration order. Ids that no longer resolve are dropped.
    pub fn course_students(&self, course_code: &str) -> Vec<&Student> {
        if !self.courses.contains_key(course_code) {
            return Vec::new();
        }

        self.enrollment_ids(course_code)
            .iter()
            .filter_map(|id| self.students.get(id))
            .collect()
    }

    /// Courses the student is registered for, in course creation order.
    pub fn student_courses(&self, student_id: &str) -> Vec<&Course> {
        self.courses
            .values()
            .filter(|course| self.is_enrolled(student_id, course.course_code()))
            .collect()
    }

    fn graded_scores(&self, course_code: &str) -> Vec<f64> {
        self.course_students(course_code)
            .into_iter()
            .filter_map(|student| student.grade(course_code))
            .collect()
    }

    /// Mean grade of the enrolled students that have one. Ungraded students are
    /// left out rather than counted as zero.
    pub fn course_average(&self, course_code: &str) -> Option<f64> {
        if !self.courses.contains_key(course_code) {
            return None;
        }

        let scores = self.graded_scores(course_code);
        if scores.is_empty() {
            return None;
        }
        Some(scores.iter().sum::<f64>() / scores.len() as f64)
    }

    pub fn student_transcript(&self, student_id: &str) -> Option<Transcript> {
        let student = self.students.get(student_id)?;

        let mut courses = Vec::new();
        let mut passed_courses = 0;
        let mut grade_points = 0.0;

        for (course_code, score) in student.grades() {
            let Some(course) = self.courses.get(course_code) else {
                continue;
            };

            let letter_grade = GradeCategory::letter_grade(score);
            let passed = GradeCategory::is_passing(score);
            if passed {
                passed_courses += 1;
                grade_points += letter_grade.grade_points();
            }

            courses.push(TranscriptEntry {
                course_code: course_code.to_string(),
                course_name: course.course_name().to_string(),
                numeric_grade: score,
                letter_grade,
                status: if passed {
                    GradeStatus::Pass
                } else {
                    GradeStatus::Fail
                },
            });
        }

        // failing courses count in the denominator
        let total_courses = courses.len();
        let gpa = if total_courses > 0 {
            round2(grade_points / total_courses as f64)
        } else {
            0.0
        };

        Some(Transcript {
            student_id: student.student_id().to_string(),
            student_name: student.student_name().to_string(),
            courses,
            gpa,
            total_courses,
            passed_courses,
        })
    }

    pub fn course_performance(&self, course_code: &str) -> Option<CoursePerformance> {
        let course = self.courses.get(course_code)?;
        let num_students = self.course_students(course_code).len();
        let scores = self.graded_scores(course_code);

        Some(CoursePerformance {
            course_code: course.course_code().to_string(),
            course_name: course.course_name().to_string(),
            num_students,
            num_graded: scores.len(),
            statistics: statistics(&scores),
        })
    }

    pub fn course_grades(&self, course_code: &str) -> Option<CourseGradeSheet> {
        let course = self.courses.get(course_code)?;

        let grades = self
            .course_students(course_code)
            .into_iter()
            .filter_map(|student| {
                student.grade(course_code).map(|grade| StudentGradeRow {
                    student_id: student.student_id().to_string(),
                    student_name: student.student_name().to_string(),
                    grade,
                    letter_grade: GradeCategory::letter_grade(grade),
                })
            })
            .collect();

        Some(CourseGradeSheet {
            course_code: course.course_code().to_string(),
            course_name: course.course_name().to_string(),
            grades,
        })
    }

    /// The student's grades joined with course names; orphaned entries are skipped.
    pub fn student_grade_report(&self, student_id: &str) -> Option<StudentGradeReport> {
        let student = self.students.get(student_id)?;

        let grades = student
            .grades()
            .filter_map(|(code, grade)| {
                self.courses.get(code).map(|course| CourseGradeRow {
                    course_code: code.to_string(),
                    course_name: course.course_name().to_string(),
                    grade,
                    letter_grade: GradeCategory::letter_grade(grade),
                })
            })
            .collect();

        Some(StudentGradeReport {
            student_id: student.student_id().to_string(),
            student_name: student.student_name().to_string(),
            grades,
        })
    }

    pub fn course_comparison(&self) -> Vec<CourseSummary> {
        self.courses
            .values()
            .map(|course| {
                let stats = statistics(&self.graded_scores(course.course_code()));
                CourseSummary {
                    course_code: course.course_code().to_string(),
                    course_name: course.course_name().to_string(),
                    average_grade: stats.as_ref().map(|s| s.average_grade),
                    pass_rate: stats.as_ref().map(|s| s.pass_rate),
                }
            })
            .collect()
    }
}

fn statistics(scores: &[f64]) -> Option<CourseStatistics> {
    if scores.is_empty() {
        return None;
    }

    let count = scores.len() as f64;
    let highest_grade = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let lowest_grade = scores.iter().copied().fold(f64::INFINITY, f64::min);
    let passing = scores
        .iter()
        .filter(|score| GradeCategory::is_passing(**score))
        .count();

    let mut counts: IndexMap<LetterGrade, usize> =
        LetterGrade::ALL.iter().map(|grade| (*grade, 0)).collect();
    for score in scores {
        *counts
            .entry(GradeCategory::letter_grade(*score))
            .or_insert(0) += 1;
    }
    counts.retain(|_, count| *count > 0);

    Some(CourseStatistics {
        average_grade: scores.iter().sum::<f64>() / count,
        highest_grade,
        lowest_grade,
        pass_rate: passing as f64 / count * 100.0,
        grade_distribution: counts,
    })
}
