//! Builds a consistent school graph of any size for demos and load tests.
//!
//! Every generated school is local-only (`-1`, `-2`, ...), every dependent
//! points at a generated school, and every class is taught by a teacher of its
//! own school. With a seed the output is reproducible, except for local ids
//! which are always fresh.

use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use kd_utils::ascii_slug;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
	domain::{
		class::grade_of, Class, LocalSchoolId, School, SchoolId, Student, Teacher, TeacherId,
	},
	store::LocalData,
};

mod names;

use names::*;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
	pub school_count: usize,
	pub teachers_per_school: usize,
	pub classes_per_school: usize,
	pub students_per_class: usize,
	/// Fixed seed for reproducible output, entropy otherwise
	#[serde(default)]
	pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
	fn default() -> Self {
		Self {
			school_count: 3,
			teachers_per_school: 4,
			classes_per_school: 6,
			students_per_class: 20,
			seed: None,
		}
	}
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GeneratorError {
	#[error("{classes} classes per school need at least one teacher per school")]
	NoTeachers { classes: usize },
	#[error("{0} schools cannot be numbered with local ids")]
	TooManySchools(usize),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GenerationSummary {
	pub schools: usize,
	pub teachers: usize,
	pub classes: usize,
	pub students: usize,
}

impl fmt::Display for GenerationSummary {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"Generated {} schools, {} teachers, {} classes, and {} students",
			self.schools, self.teachers, self.classes, self.students
		)
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedData {
	pub schools: Vec<School>,
	pub teachers: Vec<Teacher>,
	pub classes: Vec<Class>,
	pub students: Vec<Student>,
}

impl GeneratedData {
	pub fn summary(&self) -> GenerationSummary {
		GenerationSummary {
			schools: self.schools.len(),
			teachers: self.teachers.len(),
			classes: self.classes.len(),
			students: self.students.len(),
		}
	}

	pub fn summary_line(&self) -> String {
		self.summary().to_string()
	}

	/// A ready to use aggregate with initial setup marked complete.
	pub fn into_local_data(self) -> LocalData {
		LocalData {
			initial_setup_complete: true,
			schools: self.schools,
			teachers: self.teachers,
			classes: self.classes,
			students: self.students,
			last_updated: Utc::now(),
		}
	}
}

pub fn generate(config: &GeneratorConfig) -> Result<GeneratedData, GeneratorError> {
	if config.classes_per_school > 0 && config.teachers_per_school == 0 {
		return Err(GeneratorError::NoTeachers {
			classes: config.classes_per_school,
		});
	}

	let rng = match config.seed {
		Some(seed) => StdRng::seed_from_u64(seed),
		None => StdRng::from_entropy(),
	};

	let mut generator = Generator { config, rng };
	let mut data = LocalData::default();

	for index in 0..config.school_count {
		let id = u64::try_from(index + 1)
			.ok()
			.and_then(LocalSchoolId::new)
			.ok_or(GeneratorError::TooManySchools(config.school_count))?;

		generator.school_graph(id, &mut data);
	}

	data.recompute_denormalized_counts();

	let LocalData {
		schools,
		teachers,
		classes,
		students,
		..
	} = data;
	let generated = GeneratedData {
		schools,
		teachers,
		classes,
		students,
	};

	info!(summary = %generated.summary(), seed = ?config.seed, "generated test data");

	Ok(generated)
}

struct Generator<'c> {
	config: &'c GeneratorConfig,
	rng: StdRng,
}

impl Generator<'_> {
	fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
		items[self.rng.gen_range(0..items.len())]
	}

	fn uuid(&mut self) -> Uuid {
		uuid::Builder::from_random_bytes(self.rng.gen()).into_uuid()
	}

	fn phone(&mut self, area: std::ops::RangeInclusive<u32>) -> String {
		format!(
			"0{} {} {} {}",
			self.rng.gen_range(area),
			self.rng.gen_range(100..=999),
			self.rng.gen_range(10..=99),
			self.rng.gen_range(10..=99)
		)
	}

	fn person(&mut self) -> (&'static str, &'static str) {
		(self.pick(FIRST_NAMES), self.pick(LAST_NAMES))
	}

	/// Adds one school with its teachers, classes and students.
	fn school_graph(&mut self, id: LocalSchoolId, data: &mut LocalData) {
		let school = self.school(id);
		debug!(school_id = %school.school_id, name = %school.school_name, "generating school");

		let first_teacher = data.teachers.len();
		for _ in 0..self.config.teachers_per_school {
			let teacher = self.teacher(&school);
			data.teachers.push(teacher);
		}

		let first_class = data.classes.len();
		for n in 0..self.config.classes_per_school {
			let teacher = &data.teachers[first_teacher + n % self.config.teachers_per_school];
			let class = self.class(&school, teacher);
			data.classes.push(class);
		}

		for class_index in first_class..data.classes.len() {
			for seq in 1..=self.config.students_per_class {
				let student = self.student(&data.classes[class_index], seq);
				data.students.push(student);
			}
		}

		data.schools.push(school);
	}

	fn school(&mut self, id: LocalSchoolId) -> School {
		let city = self.pick(CITIES);
		let kind = self.pick(SCHOOL_TYPES);
		let namesake = SCHOOL_NAMESAKES[self.rng.gen_range(0..SCHOOL_NAMESAKES.len())];
		let (first, last) = self.person();

		let mut school = School::new_local(id, format!("{} {kind}", namesake.unwrap_or(city)), city);
		school.address = Some(format!(
			"{city} Merkez, {}. Sokak No: {}",
			self.rng.gen_range(1..=100),
			self.rng.gen_range(1..=50)
		));
		school.phone = Some(self.phone(200..=599));
		school.email = Some(format!("info@{}okul.edu.tr", ascii_slug(city)));
		school.principal = Some(format!("{first} {last}"));
		school.established_year = Some(self.rng.gen_range(1950..=2020));

		school
	}

	fn teacher(&mut self, school: &School) -> Teacher {
		let (first, last) = self.person();

		let mut teacher = Teacher::new(
			school.school_id,
			first,
			last,
			format!(
				"{}.{}@{}okul.edu.tr",
				ascii_slug(first),
				ascii_slug(last),
				ascii_slug(&school.city)
			),
		);
		teacher.teacher_id = TeacherId::from(self.uuid());
		teacher.phone = Some(self.phone(500..=599));
		teacher.subject = Some(self.pick(SUBJECTS).to_string());
		teacher.experience_years = Some(self.rng.gen_range(1..=25));

		teacher
	}

	fn class(&mut self, school: &School, teacher: &Teacher) -> Class {
		let class_name = self.pick(CLASS_NAMES);

		let mut class = Class::new(school.school_id, teacher.teacher_id.clone(), class_name);
		class.class_id = self.uuid().into();
		class.description = Some(format!(
			"{class_name} sınıfı - {} dersi",
			teacher.subject.as_deref().unwrap_or_default()
		));
		class.capacity = u32::try_from(self.config.students_per_class).ok();
		class.academic_year = Some(ACADEMIC_YEAR.to_string());

		class
	}

	fn student(&mut self, class: &Class, seq: usize) -> Student {
		let (first, last) = self.person();
		let grade = class
			.grade_level
			.clone()
			.or_else(|| grade_of(&class.class_name))
			.unwrap_or_default();

		let mut student = Student::new(
			class.school_id,
			class.class_id.clone(),
			first,
			last,
			student_number(class.school_id, &grade, seq),
		);
		student.student_internal_id = self.uuid().into();
		student.email = Some(format!(
			"{}.{}@ogrenci.edu.tr",
			ascii_slug(first),
			ascii_slug(last)
		));
		student.grade = Some(grade);
		student.join_date = term_day(NaiveDate::from_ymd_opt(2024, 9, self.rng.gen_range(1..=30)));
		student.last_active = term_day(NaiveDate::from_ymd_opt(2025, 6, 13))
			.map(|end| end - Duration::days(self.rng.gen_range(0..=7)));
		student.avg_score = Some(f64::from(self.rng.gen_range(60..=100_u32)));
		student.games_played = Some(self.rng.gen_range(5..=50));
		student.progress_status = Some(self.pick(PROGRESS_STATUSES).to_string());
		student.parent_name = Some(format!("{} {last}", self.pick(FIRST_NAMES)));
		student.parent_email = Some(format!("{}.veli@gmail.com", ascii_slug(first)));
		student.parent_phone = Some(self.phone(500..=599));

		student
	}
}

/// Readable student number: school magnitude, grade, then a three digit
/// sequence within the class, e.g. `23007` for the 7th student of a 3rd
/// grade class in school `-2`.
pub fn student_number(school_id: SchoolId, grade: &str, seq: usize) -> String {
	format!("{}{grade}{seq:03}", school_id.magnitude())
}

fn term_day(date: Option<NaiveDate>) -> Option<DateTime<Utc>> {
	date.and_then(|date| date.and_hms_opt(9, 0, 0))
		.map(|time| time.and_utc())
}
