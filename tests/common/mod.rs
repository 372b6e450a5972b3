#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use tabular_mapper::{FieldDescriptor, FieldType, FieldValue, FieldValueType, Primitive, Record};
use tempfile::{TempDir, tempdir};

/// A value type the codec has no classification for.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Badge(pub String);

impl FieldValueType for Badge {
    fn field_type() -> FieldType {
        FieldType::Scalar(Primitive::Opaque("badge"))
    }

    fn into_field_value(self) -> FieldValue {
        FieldValue::Text(self.0)
    }

    fn from_field_value(value: FieldValue) -> Result<Self, &'static str> {
        match value {
            FieldValue::Text(text) => Ok(Badge(text)),
            other => Err(other.kind_name()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Employee {
    pub id: i32,
    pub name: String,
    pub birth_date: NaiveDateTime,
    pub salary: Option<Decimal>,
    pub nullable_integer: Option<i32>,
    pub nullable_date: Option<NaiveDateTime>,
    pub scores: Vec<i32>,
    pub tags: Vec<String>,
    pub badge: Badge,
    pub active: bool,
    pub rating: f64,
    pub weight: f32,
}

impl Record for Employee {
    fn fields() -> Vec<FieldDescriptor<Self>> {
        vec![
            FieldDescriptor::new("Id", |r: &Employee| r.id, |r: &mut Employee, v| r.id = v),
            FieldDescriptor::new(
                "Name",
                |r: &Employee| r.name.clone(),
                |r: &mut Employee, v| r.name = v,
            ),
            FieldDescriptor::new(
                "BirthDate",
                |r: &Employee| r.birth_date,
                |r: &mut Employee, v| r.birth_date = v,
            ),
            FieldDescriptor::new(
                "Salary",
                |r: &Employee| r.salary,
                |r: &mut Employee, v| r.salary = v,
            ),
            FieldDescriptor::new(
                "NullableIntegerValue",
                |r: &Employee| r.nullable_integer,
                |r: &mut Employee, v| r.nullable_integer = v,
            ),
            FieldDescriptor::new(
                "NullableDateTimeValue",
                |r: &Employee| r.nullable_date,
                |r: &mut Employee, v| r.nullable_date = v,
            ),
            FieldDescriptor::new(
                "Scores",
                |r: &Employee| r.scores.clone(),
                |r: &mut Employee, v| r.scores = v,
            ),
            FieldDescriptor::new(
                "Tags",
                |r: &Employee| r.tags.clone(),
                |r: &mut Employee, v| r.tags = v,
            ),
            FieldDescriptor::new(
                "Badge",
                |r: &Employee| r.badge.clone(),
                |r: &mut Employee, v| r.badge = v,
            ),
            FieldDescriptor::new(
                "Active",
                |r: &Employee| r.active,
                |r: &mut Employee, v| r.active = v,
            ),
            FieldDescriptor::new(
                "Rating",
                |r: &Employee| r.rating,
                |r: &mut Employee, v| r.rating = v,
            ),
            FieldDescriptor::new(
                "Weight",
                |r: &Employee| r.weight,
                |r: &mut Employee, v| r.weight = v,
            ),
        ]
    }
}

pub const EMPLOYEE_FIELD_COUNT: usize = 12;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid date")
}

/// Deterministic sample data; every third employee has the optional fields
/// unset.
pub fn sample_employees(count: usize) -> Vec<Employee> {
    const FIRST: [&str; 5] = ["Marshall", "Jack", "Lucy", "John", "Joe"];
    const LAST: [&str; 5] = ["Doe", "Ellis", "Erikssen", "Johnson", "Park"];
    (0..count)
        .map(|idx| {
            let n = idx as i32;
            let sparse = idx % 3 == 2;
            Employee {
                id: n + 1,
                name: format!("{} {}", FIRST[idx % 5], LAST[(idx / 5) % 5]),
                birth_date: date(1960 + n % 30, 1 + (idx % 12) as u32, 1 + (idx % 28) as u32),
                salary: (!sparse).then(|| Decimal::new(400_000 + i64::from(n) * 137, 2)),
                nullable_integer: (!sparse).then_some(n * 10),
                nullable_date: (!sparse).then(|| date(2020, 1 + (idx % 12) as u32, 15)),
                scores: (1..=(idx % 4) as i32 + 1).collect(),
                tags: vec!["ab".to_string(), format!("t{idx}")],
                badge: Badge(format!("B-{idx:03}")),
                active: idx % 2 == 0,
                rating: 1.5 + f64::from(n) * 0.1,
                weight: 60.5 + n as f32 * 0.3,
            }
        })
        .collect()
}

/// Compares decoded employees field by field, allowing float fields to
/// drift within rounding tolerance.
pub fn assert_same_employees(actual: &[Employee], expected: &[Employee]) {
    assert_eq!(actual.len(), expected.len());
    for (got, want) in actual.iter().zip(expected) {
        assert!(
            (got.rating - want.rating).abs() < 1e-9,
            "rating of employee {}: {} != {}",
            want.id,
            got.rating,
            want.rating
        );
        assert!(
            (got.weight - want.weight).abs() < 1e-4,
            "weight of employee {}: {} != {}",
            want.id,
            got.weight,
            want.weight
        );
        let without_floats = |e: &Employee| Employee {
            rating: 0.0,
            weight: 0.0,
            ..e.clone()
        };
        assert_eq!(without_floats(got), without_floats(want));
    }
}

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }

    pub fn join(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }
}

pub const PEOPLE_LAYOUT: &str = "\
columns:
  - field: Id
    datatype: int32
  - field: Name
    header: Full name
    datatype: string
  - field: Joined
    datatype: datetime
  - field: Salary
    datatype: decimal?
  - field: Active
    datatype: boolean?
  - field: Scores
    datatype: int32[]
    list_separator: \"-\"
";

pub const PEOPLE_CSV: &str = "\
Id,Full name,Joined,Salary,Active,Scores
1,Ada Lovelace,2021-03-04,4500.25,yes,1-2-3
2,Alan Turing,05/06/2019,,no,4
3,Grace Hopper,2018-01-02 08:30:00,7000,,10
";
