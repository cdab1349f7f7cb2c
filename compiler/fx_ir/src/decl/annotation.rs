use crate::Location;

/// A typed annotation value.
#[derive(Clone, Debug, PartialEq)]
pub enum AnnotationValue {
    Int(i32),
    UInt(u32),
    Float(f32),
    Double(f64),
    Bool(bool),
    String(String),
}

impl AnnotationValue {
    /// Numeric kind code written before the value in compiled output.
    pub fn kind_code(&self) -> u32 {
        match self {
            AnnotationValue::Int(_) => 0,
            AnnotationValue::UInt(_) => 1,
            AnnotationValue::Float(_) => 2,
            AnnotationValue::Double(_) => 3,
            AnnotationValue::Bool(_) => 4,
            AnnotationValue::String(_) => 5,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnnotationEntry {
    pub key: String,
    pub value: AnnotationValue,
}

/// Ordered key/value metadata attached to a program.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Annotation {
    pub location: Location,
    pub entries: Vec<AnnotationEntry>,
}

impl Annotation {
    pub fn new(location: Location) -> Self {
        Annotation {
            location,
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_entry(mut self, key: impl Into<String>, value: AnnotationValue) -> Self {
        self.entries.push(AnnotationEntry {
            key: key.into(),
            value,
        });
        self
    }

    pub fn get(&self, key: &str) -> Option<&AnnotationValue> {
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| &entry.value)
    }
}
