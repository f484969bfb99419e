use crate::domain::grading::LetterGrade;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GradeStatus {
    Pass,
    Fail,
}

impl fmt::Display for GradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GradeStatus::Pass => f.write_str("PASS"),
            GradeStatus::Fail => f.write_str("FAIL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub course_code: String,
    pub course_name: String,
    pub numeric_grade: f64,
    pub letter_grade: LetterGrade,
    pub status: GradeStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub student_id: String,
    pub student_name: String,
    pub courses: Vec<TranscriptEntry>,
    pub gpa: f64,
    pub total_courses: usize,
    pub passed_courses: usize,
}

/// Summary figures over the graded students of one course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseStatistics {
    pub average_grade: f64,
    pub highest_grade: f64,
    pub lowest_grade: f64,
    pub pass_rate: f64,
    /// Only letters with at least one student, best to worst.
    pub grade_distribution: IndexMap<LetterGrade, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoursePerformance {
    pub course_code: String,
    pub course_name: String,
    pub num_students: usize,
    pub num_graded: usize,
    /// `None` when no enrolled student has a grade yet.
    pub statistics: Option<CourseStatistics>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentGradeRow {
    pub student_id: String,
    pub student_name: String,
    pub grade: f64,
    pub letter_grade: LetterGrade,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseGradeSheet {
    pub course_code: String,
    pub course_name: String,
    pub grades: Vec<StudentGradeRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseGradeRow {
    pub course_code: String,
    pub course_name: String,
    pub grade: f64,
    pub letter_grade: LetterGrade,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentGradeReport {
    pub student_id: String,
    pub student_name: String,
    pub grades: Vec<CourseGradeRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseSummary {
    pub course_code: String,
    pub course_name: String,
    pub average_grade: Option<f64>,
    pub pass_rate: Option<f64>,
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(2.5), 2.5);
        assert_eq!(round2(4.666_666), 4.67);
        assert_eq!(round2(3.333_333), 3.33);
        assert_eq!(round2(2.125), 2.12);
        assert_eq!(round2(2.625), 2.62);
    }

    #[test]
    fn test_performance_json_shape() {
        let mut distribution = IndexMap::new();
        distribution.insert(LetterGrade::A, 1);
        distribution.insert(LetterGrade::BPlus, 2);
        let report = CoursePerformance {
            course_code: "CS101".to_string(),
            course_name: "Intro".to_string(),
            num_students: 3,
            num_graded: 3,
            statistics: Some(CourseStatistics {
                average_grade: 78.0,
                highest_grade: 85.0,
                lowest_grade: 75.0,
                pass_rate: 100.0,
                grade_distribution: distribution,
            }),
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["statistics"]["grade_distribution"]["B+"], 2);
        assert_eq!(json["num_graded"], 3);
    }
}
