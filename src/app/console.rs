use crate::adapters::{JsonFileRepository, DEFAULT_DATA_FILE};
use crate::app::service::GradebookService;
use crate::domain::grading::GradeCategory;
use crate::domain::ports::GradeRepository;
use crate::domain::report::Transcript;
use crate::utils::error::{GradebookError, Result};
use crate::utils::validation::{parse_choice, parse_score};
use std::io::{BufRead, Write};

/// Whether the menu loop keeps going. Input running out ends the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Interactive menu front end. Reads choices from `input`, writes screens to `output`.
pub struct Console<I, O> {
    input: I,
    output: O,
}

impl<I: BufRead, O: Write> Console<I, O> {
    pub fn new(input: I, output: O) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> O {
        self.output
    }

    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Asks until the answer is a number in range. `None` means input ended.
    fn read_choice(&mut self, prompt: &str, max: usize, allow_zero: bool) -> Result<Option<usize>> {
        loop {
            let Some(line) = self.read_line(prompt)? else {
                return Ok(None);
            };
            if let Some(choice) = parse_choice(&line, max, allow_zero) {
                return Ok(Some(choice));
            }
        }
    }

    fn pause(&mut self) -> Result<Flow> {
        match self.read_line("\nPress Enter to continue...")? {
            Some(_) => Ok(Flow::Continue),
            None => Ok(Flow::Quit),
        }
    }

    fn menu(&mut self, title: &str, options: &[&str]) -> Result<Option<usize>> {
        writeln!(self.output, "\n===== {} =====", title)?;
        for (index, option) in options.iter().enumerate() {
            writeln!(self.output, "{}. {}", index + 1, option)?;
        }
        writeln!(self.output, "0. Back to Main Menu")?;
        let prompt = format!("\nSelect an option (0-{}): ", options.len());
        self.read_choice(&prompt, options.len(), true)
    }

    fn report_error(&mut self, error: &GradebookError) -> Result<()> {
        tracing::debug!("Console operation failed: {}", error);
        writeln!(self.output, "\n{}", error.user_friendly_message())?;
        Ok(())
    }

    pub async fn run<R: GradeRepository>(
        &mut self,
        service: &mut GradebookService<R>,
    ) -> Result<()> {
        loop {
            writeln!(self.output, "\n===== GRADE MANAGEMENT SYSTEM =====")?;
            writeln!(self.output, "1. Student Management")?;
            writeln!(self.output, "2. Course Management")?;
            writeln!(self.output, "3. Grade Management")?;
            writeln!(self.output, "4. Reports")?;
            writeln!(self.output, "5. Save/Load Data")?;
            writeln!(self.output, "0. Exit")?;

            let Some(choice) = self.read_choice("\nSelect an option (0-5): ", 5, true)? else {
                break;
            };

            let flow = match choice {
                0 => break,
                1 => self.student_menu(service).await?,
                2 => self.course_menu(service).await?,
                3 => self.grade_menu(service).await?,
                4 => self.report_menu(service)?,
                _ => self.data_menu(service).await?,
            };
            if flow == Flow::Quit {
                break;
            }
        }

        writeln!(self.output, "\nExiting Grade Management System. Goodbye!")?;
        Ok(())
    }

    async fn student_menu<R: GradeRepository>(
        &mut self,
        service: &mut GradebookService<R>,
    ) -> Result<Flow> {
        let options = [
            "Add New Student",
            "View All Students",
            "View Student Details",
            "Register Student for Course",
        ];

        loop {
            let Some(choice) = self.menu("STUDENT MANAGEMENT", &options)? else {
                return Ok(Flow::Quit);
            };

            match choice {
                0 => return Ok(Flow::Continue),
                1 => {
                    let Some(student_id) = self.read_line("Enter Student ID: ")? else {
                        return Ok(Flow::Quit);
                    };
                    if service.manager().student(&student_id).is_some() {
                        writeln!(self.output, "\nStudent with ID {} already exists!", student_id)?;
                    } else {
                        let Some(student_name) = self.read_line("Enter Student Name: ")? else {
                            return Ok(Flow::Quit);
                        };
                        match service.create_student(&student_id, &student_name).await {
                            Ok(()) => writeln!(
                                self.output,
                                "\nStudent {} added successfully!",
                                student_name
                            )?,
                            Err(e) => self.report_error(&e)?,
                        }
                    }
                }
                2 => {
                    let students = service.students();
                    if students.is_empty() {
                        writeln!(self.output, "\nNo students found in the system.")?;
                    } else {
                        writeln!(self.output, "\n===== ALL STUDENTS =====")?;
                        for student in students {
                            writeln!(
                                self.output,
                                "ID: {}, Name: {}",
                                student.student_id(), student.student_name()
                            )?;
                        }
                    }
                }
                3 => {
                    let Some(student_id) = self.read_line("Enter Student ID: ")? else {
                        return Ok(Flow::Quit);
                    };
                    match service.student_detail(&student_id) {
                        Ok(detail) => {
                            writeln!(self.output, "\n===== STUDENT DETAILS =====")?;
                            writeln!(self.output, "ID: {}", detail.student_id)?;
                            writeln!(self.output, "Name: {}", detail.student_name)?;
                            if detail.enrolled_courses.is_empty() {
                                writeln!(self.output, "\nNot enrolled in any courses.")?;
                            } else {
                                writeln!(self.output, "\nEnrolled Courses:")?;
                                for course in &detail.enrolled_courses {
                                    let grade = match (course.grade, course.letter_grade) {
                                        (Some(grade), Some(letter)) => {
                                            format!("{} ({})", grade, letter)
                                        }
                                        _ => "Not graded".to_string(),
                                    };
                                    writeln!(
                                        self.output,
                                        "  {}: {} - {}",
                                        course.course_code, course.course_name, grade
                                    )?;
                                }
                            }
                        }
                        Err(e) => self.report_error(&e)?,
                    }
                }
                _ => {
                    if self.register_student(service).await? == Flow::Quit {
                        return Ok(Flow::Quit);
                    }
                }
            }

            if self.pause()? == Flow::Quit {
                return Ok(Flow::Quit);
            }
        }
    }

    async fn register_student<R: GradeRepository>(
        &mut self,
        service: &mut GradebookService<R>,
    ) -> Result<Flow> {
        let Some(student_id) = self.read_line("Enter Student ID: ")? else {
            return Ok(Flow::Quit);
        };
        if service.manager().student(&student_id).is_none() {
            writeln!(self.output, "\nStudent with ID {} not found!", student_id)?;
            return Ok(Flow::Continue);
        }

        let courses: Vec<(String, String)> = service
            .courses()
            .iter()
            .map(|c| (c.course_code().to_string(), c.course_name().to_string()))
            .collect();
        if courses.is_empty() {
            writeln!(self.output, "\nNo courses found in the system.")?;
            return Ok(Flow::Continue);
        }

        writeln!(self.output, "\nAvailable Courses:")?;
        for (index, (code, name)) in courses.iter().enumerate() {
            writeln!(self.output, "{}. {}: {}", index + 1, code, name)?;
        }
        let prompt = "\nSelect a course (number): ";
        let Some(index) = self.read_choice(prompt, courses.len(), false)? else {
            return Ok(Flow::Quit);
        };
        let (code, name) = &courses[index - 1];

        match service.enroll(&student_id, code).await {
            Ok(()) => writeln!(self.output, "\nStudent registered for {} successfully!", name)?,
            Err(GradebookError::Rejected { .. }) => writeln!(
                self.output,
                "\nFailed to register student for the course. \
                 The student may already be registered."
            )?,
            Err(e) => self.report_error(&e)?,
        }
        Ok(Flow::Continue)
    }

    async fn course_menu<R: GradeRepository>(
        &mut self,
        service: &mut GradebookService<R>,
    ) -> Result<Flow> {
        let options = ["Add New Course", "View All Courses", "View Course Details"];

        loop {
            let Some(choice) = self.menu("COURSE MANAGEMENT", &options)? else {
                return Ok(Flow::Quit);
            };

            match choice {
                0 => return Ok(Flow::Continue),
                1 => {
                    let Some(course_code) = self.read_line("Enter Course Code: ")? else {
                        return Ok(Flow::Quit);
                    };
                    if service.manager().course(&course_code).is_some() {
                        writeln!(
                            self.output,
                            "\nCourse with code {} already exists!",
                            course_code
                        )?;
                    } else {
                        let Some(course_name) = self.read_line("Enter Course Name: ")? else {
                            return Ok(Flow::Quit);
                        };
                        match service.create_course(&course_code, &course_name).await {
                            Ok(()) => writeln!(
                                self.output,
                                "\nCourse {} added successfully!",
                                course_name
                            )?,
                            Err(e) => self.report_error(&e)?,
                        }
                    }
                }
                2 => {
                    let courses = service.courses();
                    if courses.is_empty() {
                        writeln!(self.output, "\nNo courses found in the system.")?;
                    } else {
                        writeln!(self.output, "\n===== ALL COURSES =====")?;
                        for course in courses {
                            writeln!(
                                self.output,
                                "Code: {}, Name: {}",
                                course.course_code(), course.course_name()
                            )?;
                        }
                    }
                }
                _ => {
                    let Some(course_code) = self.read_line("Enter Course Code: ")? else {
                        return Ok(Flow::Quit);
                    };
                    match service.course_detail(&course_code) {
                        Ok(detail) => {
                            writeln!(self.output, "\n===== COURSE DETAILS =====")?;
                            writeln!(self.output, "Code: {}", detail.course_code)?;
                            writeln!(self.output, "Name: {}", detail.course_name)?;
                            if detail.students.is_empty() {
                                writeln!(self.output, "\nNo students enrolled in this course.")?;
                            } else {
                                writeln!(self.output, "\nEnrolled Students:")?;
                                for student in &detail.students {
                                    let grade = match (student.grade, student.letter_grade) {
                                        (Some(grade), Some(letter)) => {
                                            format!("{} ({})", grade, letter)
                                        }
                                        _ => "Not graded".to_string(),
                                    };
                                    writeln!(
                                        self.output,
                                        "  {}: {} - {}",
                                        student.student_id, student.student_name, grade
                                    )?;
                                }
                            }
                            match detail.average_grade {
                                Some(avg) => writeln!(
                                    self.output,
                                    "\nCourse Average: {:.2} ({})",
                                    avg,
                                    GradeCategory::letter_grade(avg)
                                )?,
                                None => writeln!(
                                    self.output,
                                    "\nNo grades available to calculate average."
                                )?,
                            }
                        }
                        Err(e) => self.report_error(&e)?,
                    }
                }
            }

            if self.pause()? == Flow::Quit {
                return Ok(Flow::Quit);
            }
        }
    }

    async fn grade_menu<R: GradeRepository>(
        &mut self,
        service: &mut GradebookService<R>,
    ) -> Result<Flow> {
        let options = ["Assign Grade", "View Student Grades", "Calculate Course Average"];

        loop {
            let Some(choice) = self.menu("GRADE MANAGEMENT", &options)? else {
                return Ok(Flow::Quit);
            };

            match choice {
                0 => return Ok(Flow::Continue),
                1 => {
                    if self.assign_grade(service).await? == Flow::Quit {
                        return Ok(Flow::Quit);
                    }
                }
                2 => {
                    let Some(student_id) = self.read_line("Enter Student ID: ")? else {
                        return Ok(Flow::Quit);
                    };
                    match service.student_grades(&student_id) {
                        Ok(report) if report.grades.is_empty() => {
                            writeln!(
                                self.output,
                                "\n{} has no grades recorded.",
                                report.student_name
                            )?
                        }
                        Ok(report) => {
                            writeln!(
                                self.output,
                                "\n===== GRADES FOR {} =====",
                                report.student_name
                            )?;
                            for row in &report.grades {
                                writeln!(
                                    self.output,
                                    "{}: {} - {} ({})",
                                    row.course_code, row.course_name, row.grade, row.letter_grade
                                )?;
                            }
                        }
                        Err(e) => self.report_error(&e)?,
                    }
                }
                _ => {
                    let Some(course_code) = self.read_line("Enter Course Code: ")? else {
                        return Ok(Flow::Quit);
                    };
                    match service.course_average(&course_code) {
                        Ok(Some(avg)) => {
                            let name = service
                                .manager()
                                .course(&course_code)
                                .map(|c| c.course_name().to_string())
                                .unwrap_or_default();
                            writeln!(
                                self.output,
                                "\nAverage grade for {}: {:.2} ({})",
                                name,
                                avg,
                                GradeCategory::letter_grade(avg)
                            )?;
                        }
                        Ok(None) => writeln!(
                            self.output,
                            "\nNo grades available to calculate average for {}.",
                            course_code
                        )?,
                        Err(e) => self.report_error(&e)?,
                    }
                }
            }

            if self.pause()? == Flow::Quit {
                return Ok(Flow::Quit);
            }
        }
    }

    async fn assign_grade<R: GradeRepository>(
        &mut self,
        service: &mut GradebookService<R>,
    ) -> Result<Flow> {
        let Some(student_id) = self.read_line("Enter Student ID: ")? else {
            return Ok(Flow::Quit);
        };
        let detail = match service.student_detail(&student_id) {
            Ok(detail) => detail,
            Err(e) => {
                self.report_error(&e)?;
                return Ok(Flow::Continue);
            }
        };

        if detail.enrolled_courses.is_empty() {
            writeln!(
                self.output,
                "\nStudent {} is not enrolled in any courses.",
                detail.student_name
            )?;
            return Ok(Flow::Continue);
        }

        writeln!(self.output, "\nCourses for {}:", detail.student_name)?;
        for (index, course) in detail.enrolled_courses.iter().enumerate() {
            let current = course
                .grade
                .map(|grade| grade.to_string())
                .unwrap_or_else(|| "Not graded".to_string());
            writeln!(
                self.output,
                "{}. {}: {} - Current Grade: {}",
                index + 1,
                course.course_code,
                course.course_name,
                current
            )?;
        }

        let prompt = "\nSelect a course (number): ";
        let Some(index) = self.read_choice(prompt, detail.enrolled_courses.len(), false)? else {
            return Ok(Flow::Quit);
        };
        let course = &detail.enrolled_courses[index - 1];

        let (min_score, max_score) = service.score_range();
        let prompt = format!(
            "Enter grade for {} ({}-{}): ",
            course.course_name, min_score, max_score
        );
        let score = loop {
            let Some(line) = self.read_line(&prompt)? else {
                return Ok(Flow::Quit);
            };
            if let Ok(score) = parse_score("grade", &line, min_score, max_score) {
                break score;
            }
        };

        match service.assign_grade(&student_id, &course.course_code, score).await {
            Ok(letter) => writeln!(
                self.output,
                "\nGrade {} ({}) assigned successfully!",
                score, letter
            )?,
            Err(e) => {
                self.report_error(&e)?;
                writeln!(self.output, "Failed to assign grade.")?;
            }
        }
        Ok(Flow::Continue)
    }

    fn report_menu<R: GradeRepository>(&mut self, service: &GradebookService<R>) -> Result<Flow> {
        let options = ["Generate Student Transcript", "Course Performance Summary"];

        loop {
            let Some(choice) = self.menu("REPORTS", &options)? else {
                return Ok(Flow::Quit);
            };

            match choice {
                0 => return Ok(Flow::Continue),
                1 => {
                    let Some(student_id) = self.read_line("Enter Student ID: ")? else {
                        return Ok(Flow::Quit);
                    };
                    match service.transcript(&student_id) {
                        Ok(transcript) => render_transcript(&mut self.output, &transcript)?,
                        Err(e) => self.report_error(&e)?,
                    }
                }
                _ => {
                    let Some(course_code) = self.read_line("Enter Course Code: ")? else {
                        return Ok(Flow::Quit);
                    };
                    self.performance_summary(service, &course_code)?;
                }
            }

            if self.pause()? == Flow::Quit {
                return Ok(Flow::Quit);
            }
        }
    }

    fn performance_summary<R: GradeRepository>(
        &mut self,
        service: &GradebookService<R>,
        course_code: &str,
    ) -> Result<()> {
        let report = match service.course_performance(course_code) {
            Ok(report) => report,
            Err(e) => return self.report_error(&e),
        };

        if report.num_students == 0 {
            writeln!(self.output, "\nNo students enrolled in {}.", report.course_name)?;
            return Ok(());
        }

        writeln!(self.output, "\n===== PERFORMANCE SUMMARY FOR {} =====", report.course_name)?;
        let Some(stats) = &report.statistics else {
            writeln!(self.output, "No grades recorded for this course.")?;
            return Ok(());
        };

        writeln!(self.output, "Number of Students: {}", report.num_students)?;
        writeln!(self.output, "Number Graded: {}", report.num_graded)?;
        for (label, value) in [
            ("Average Grade", stats.average_grade),
            ("Highest Grade", stats.highest_grade),
            ("Lowest Grade", stats.lowest_grade),
        ] {
            writeln!(
                self.output,
                "{}: {:.2} ({})",
                label,
                value,
                GradeCategory::letter_grade(value)
            )?;
        }
        writeln!(self.output, "Pass Rate: {:.2}%", stats.pass_rate)?;

        writeln!(self.output, "\nGrade Distribution:")?;
        for (letter, count) in &stats.grade_distribution {
            writeln!(self.output, "  {}: {} student(s)", letter, count)?;
        }
        Ok(())
    }

    async fn data_menu<R: GradeRepository>(
        &mut self,
        service: &mut GradebookService<R>,
    ) -> Result<Flow> {
        let options = ["Save Data to File", "Load Data from File"];

        loop {
            let Some(choice) = self.menu("DATA MANAGEMENT", &options)? else {
                return Ok(Flow::Quit);
            };

            match choice {
                0 => return Ok(Flow::Continue),
                1 => {
                    let prompt = format!("Enter filename (default: {}): ", DEFAULT_DATA_FILE);
                    let Some(filename) = self.read_line(&prompt)? else {
                        return Ok(Flow::Quit);
                    };
                    let filename = if filename.is_empty() {
                        DEFAULT_DATA_FILE.to_string()
                    } else {
                        filename
                    };

                    match JsonFileRepository::new(&filename).save(service.manager()).await {
                        Ok(()) => writeln!(
                            self.output,
                            "\nData saved successfully to {}!",
                            filename
                        )?,
                        Err(e) => {
                            tracing::error!("❌ Failed to save data to {}: {}", filename, e);
                            writeln!(self.output, "\nFailed to save data.")?;
                        }
                    }
                }
                _ => {
                    let prompt = format!(
                        "Enter filename to load (default: {}): ",
                        DEFAULT_DATA_FILE
                    );
                    let Some(filename) = self.read_line(&prompt)? else {
                        return Ok(Flow::Quit);
                    };
                    let filename = if filename.is_empty() {
                        DEFAULT_DATA_FILE.to_string()
                    } else {
                        filename
                    };

                    match JsonFileRepository::new(&filename).load().await {
                        Ok(Some(manager)) => {
                            service.replace_manager(manager);
                            writeln!(self.output, "\nData loaded successfully from {}!", filename)?;
                        }
                        Ok(None) => writeln!(
                            self.output,
                            "\nFailed to load data from {}.",
                            filename
                        )?,
                        Err(e) => {
                            tracing::error!("❌ Failed to load data from {}: {}", filename, e);
                            writeln!(self.output, "\nFailed to load data from {}.", filename)?;
                        }
                    }
                }
            }

            if self.pause()? == Flow::Quit {
                return Ok(Flow::Quit);
            }
        }
    }
}

pub fn render_transcript<W: Write>(output: &mut W, transcript: &Transcript) -> Result<()> {
    let rule = "=".repeat(60);
    let thin = "-".repeat(60);

    writeln!(output, "\n{}", rule)?;
    writeln!(
        output,
        "TRANSCRIPT FOR: {} (ID: {})",
        transcript.student_name, transcript.student_id
    )?;
    writeln!(output, "{}", rule)?;
    writeln!(output, "GPA: {:.2}", transcript.gpa)?;
    writeln!(output, "Courses Taken: {}", transcript.total_courses)?;
    writeln!(output, "Courses Passed: {}", transcript.passed_courses)?;
    writeln!(output, "{}", thin)?;
    writeln!(output, "{:<12} {:<30} {:<8} {:<6}", "COURSE CODE", "COURSE NAME", "GRADE", "STATUS")?;
    writeln!(output, "{}", thin)?;
    for course in &transcript.courses {
        writeln!(
            output,
            "{:<12} {:<30} {:<8} {:<6}",
            course.course_code,
            course.course_name,
            course.letter_grade.as_str(),
            course.status.to_string()
        )?;
    }
    writeln!(output, "{}", rule)?;
    Ok(())
}
