//! Validity oracles
//!
//! The reconciler asks an oracle, one form path at a time, whether the
//! candidate value at that path is acceptable. Any implementation of
//! [`ValidityOracle`] can be plugged in; two are provided:
//!
//! - [`FnOracle`] wraps a synchronous closure
//! - [`SchemaOracle`] checks a snapshot of the form against [`FieldRules`]

use crate::mutate;
use crate::path::FormPath;
use crate::error::PathError;
use async_trait::async_trait;
use luxide_schema::kind::{GEOMETRIC_TAGS, MATERIAL_TAGS, TEXTURE_TAGS};
use luxide_schema::Value;

/// Reports whether the value at a form path is currently valid
#[async_trait]
pub trait ValidityOracle: Send + Sync {
    /// `None` when valid, otherwise a message describing the problem
    async fn check(&self, path: &str) -> Option<String>;
}

/// Oracle backed by a synchronous closure
pub struct FnOracle<F>(pub F);

#[async_trait]
impl<F> ValidityOracle for FnOracle<F>
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    async fn check(&self, path: &str) -> Option<String> {
        (self.0)(path)
    }
}

/// Why a value failed its rule
#[derive(Debug, Clone, PartialEq)]
pub enum RuleViolation {
    /// Value type does not match schema
    TypeMismatch { expected: String, got: String },
    /// Value is out of valid range
    ValueOutOfRange { field: String, value: String },
    /// Value is not one of the allowed literals
    NotAllowed { field: String, value: String },
    /// Required field is missing
    Required,
    /// Custom validation error
    Custom(String),
}

impl std::fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TypeMismatch { expected, got } => {
                write!(f, "Type mismatch: expected {}, got {}", expected, got)
            }
            Self::ValueOutOfRange { field, value } => {
                write!(f, "Value '{}' out of range for field '{}'", value, field)
            }
            Self::NotAllowed { field, value } => {
                write!(f, "Value '{}' is not allowed for field '{}'", value, field)
            }
            Self::Required => write!(f, "Required"),
            Self::Custom(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for RuleViolation {}

/// Result of checking one field
pub type RuleResult = Result<(), RuleViolation>;

fn mismatch(expected: &str, value: &Value) -> RuleViolation {
    RuleViolation::TypeMismatch {
        expected: expected.to_string(),
        got: value.type_name().to_string(),
    }
}

/// Schema for a single form field
#[derive(Debug, Clone)]
pub enum FieldSchema {
    /// Boolean field
    Bool,
    /// Integer field with optional range
    Int { min: Option<i64>, max: Option<i64> },
    /// Float field with optional range
    Float { min: Option<f64>, max: Option<f64> },
    /// String field, optionally required to be non-empty
    String { non_empty: bool },
    /// Exact string value
    Literal(&'static str),
    /// Three numbers
    Vec3,
    /// Fixed-length array of one element type
    Tuple { len: usize, item: Box<FieldSchema> },
    /// Array of a specific type
    Array(Box<FieldSchema>),
    /// Any object
    Object,
    /// First matching alternative wins
    AnyOf(Vec<FieldSchema>),
    /// Any value type
    Any,
}

impl FieldSchema {
    pub fn int(min: Option<i64>, max: Option<i64>) -> Self {
        Self::Int { min, max }
    }

    pub fn float(min: Option<f64>, max: Option<f64>) -> Self {
        Self::Float { min, max }
    }

    pub fn name() -> Self {
        Self::String { non_empty: true }
    }

    /// One of the given string literals
    pub fn one_of(literals: &[&'static str]) -> Self {
        Self::AnyOf(literals.iter().map(|l| Self::Literal(*l)).collect())
    }

    /// A table name or an inline object
    pub fn reference() -> Self {
        Self::AnyOf(vec![Self::name(), Self::Object])
    }

    /// Validate a value against this schema
    pub fn validate(&self, field_name: &str, value: &Value) -> RuleResult {
        match self {
            Self::Bool => {
                value.as_bool().ok_or_else(|| mismatch("Bool", value))?;
            }
            Self::Int { min, max } => {
                let val = value.as_int().ok_or_else(|| mismatch("Int", value))?;
                let below = min.is_some_and(|min| val < min);
                let above = max.is_some_and(|max| val > max);
                if below || above {
                    return Err(RuleViolation::ValueOutOfRange {
                        field: field_name.to_string(),
                        value: val.to_string(),
                    });
                }
            }
            Self::Float { min, max } => {
                let val = value.as_float().ok_or_else(|| mismatch("Float", value))?;
                let below = min.is_some_and(|min| val < min);
                let above = max.is_some_and(|max| val > max);
                if below || above || val.is_nan() {
                    return Err(RuleViolation::ValueOutOfRange {
                        field: field_name.to_string(),
                        value: val.to_string(),
                    });
                }
            }
            Self::String { non_empty } => {
                let s = value.as_str().ok_or_else(|| mismatch("String", value))?;
                if *non_empty && s.is_empty() {
                    return Err(RuleViolation::Required);
                }
            }
            Self::Literal(expected) => {
                let s = value.as_str().ok_or_else(|| mismatch("String", value))?;
                if s != *expected {
                    return Err(RuleViolation::NotAllowed {
                        field: field_name.to_string(),
                        value: s.to_string(),
                    });
                }
            }
            Self::Vec3 => {
                value.as_vec3().ok_or_else(|| mismatch("Vec3", value))?;
            }
            Self::Tuple { len, item } => {
                let items = value.as_array().ok_or_else(|| mismatch("Array", value))?;
                if items.len() != *len {
                    return Err(RuleViolation::Custom(format!(
                        "Expected {} items in '{}', got {}",
                        len,
                        field_name,
                        items.len()
                    )));
                }
                for item_value in items {
                    item.validate(field_name, item_value)?;
                }
            }
            Self::Array(item) => {
                let items = value.as_array().ok_or_else(|| mismatch("Array", value))?;
                for item_value in items {
                    item.validate(field_name, item_value)?;
                }
            }
            Self::Object => {
                value.as_object().ok_or_else(|| mismatch("Object", value))?;
            }
            Self::AnyOf(options) => {
                let mut first_error = None;
                for option in options {
                    match option.validate(field_name, value) {
                        Ok(()) => return Ok(()),
                        Err(err) => {
                            first_error.get_or_insert(err);
                        }
                    }
                }
                if let Some(err) = first_error {
                    return Err(match err {
                        RuleViolation::NotAllowed { .. } | RuleViolation::TypeMismatch { .. }
                            if options.iter().all(|o| matches!(o, Self::Literal(_))) =>
                        {
                            RuleViolation::NotAllowed {
                                field: field_name.to_string(),
                                value: value.to_string(),
                            }
                        }
                        other => other,
                    });
                }
            }
            Self::Any => {}
        }
        Ok(())
    }

    /// Schema for one element, when this schema describes an array
    fn element(&self) -> Option<&FieldSchema> {
        match self {
            Self::Tuple { item, .. } | Self::Array(item) => Some(item),
            _ => None,
        }
    }
}

/// A rule applying a schema to every path matching a pattern
#[derive(Debug, Clone)]
pub struct FieldRule {
    /// Dotted keys, `*` matching any single key
    pattern: Vec<String>,
    schema: FieldSchema,
    /// Sibling numeric array this array must not exceed, element-wise
    at_most: Option<String>,
}

impl FieldRule {
    fn matches(&self, path: &FormPath) -> bool {
        self.pattern.len() == path.len()
            && self
                .pattern
                .iter()
                .zip(path.segments())
                .all(|(pattern, segment)| pattern == "*" || *pattern == segment.key)
    }
}

/// Ordered set of field rules. The first matching rule applies.
#[derive(Debug, Clone, Default)]
pub struct FieldRules {
    rules: Vec<FieldRule>,
}

impl FieldRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule for a dotted pattern
    pub fn with_rule(mut self, pattern: &str, schema: FieldSchema) -> Self {
        self.rules.push(FieldRule {
            pattern: pattern.split('.').map(str::to_string).collect(),
            schema,
            at_most: None,
        });
        self
    }

    /// Add a numeric array rule bounded element-wise by another path
    pub fn with_bounded_rule(mut self, pattern: &str, schema: FieldSchema, at_most: &str) -> Self {
        self.rules.push(FieldRule {
            pattern: pattern.split('.').map(str::to_string).collect(),
            schema,
            at_most: Some(at_most.to_string()),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Constraints of the render config editing form
    pub fn render_config() -> Self {
        let vec3 = || FieldSchema::Vec3;
        let dimension = || FieldSchema::Tuple {
            len: 2,
            item: Box::new(FieldSchema::int(Some(1), None)),
        };

        let mut rules = Self::new()
            .with_rule("name", FieldSchema::name())
            .with_rule("parameters.image_dimensions", dimension())
            .with_bounded_rule(
                "parameters.tile_dimensions",
                dimension(),
                "parameters.image_dimensions",
            )
            .with_rule("parameters.gamma_correction", FieldSchema::float(Some(1.0), Some(5.0)))
            .with_rule("parameters.samples_per_checkpoint", FieldSchema::int(Some(1), Some(1000)))
            .with_rule("parameters.total_checkpoints", FieldSchema::int(Some(1), Some(1000)))
            .with_rule("parameters.saved_checkpoint_limit", FieldSchema::int(Some(0), Some(1000)))
            .with_rule("parameters.max_bounces", FieldSchema::int(Some(1), Some(200)))
            .with_rule("parameters.use_scaling_truncation", FieldSchema::Bool)
            .with_rule("active_scene", FieldSchema::reference());

        for camera in ["cameras.*", "scenes.*.camera", "active_scene.camera"] {
            let field = |name: &str| format!("{}.{}", camera, name);
            rules = rules
                .with_rule(
                    &field("vertical_field_of_view_degrees"),
                    FieldSchema::float(Some(0.0), Some(180.0)),
                )
                .with_rule(
                    &field("defocus_angle_degrees"),
                    FieldSchema::float(Some(0.0), Some(180.0)),
                )
                .with_rule(&field("eye_location"), vec3())
                .with_rule(&field("target_location"), vec3())
                .with_rule(&field("view_up"), vec3())
                .with_rule(
                    &field("focus_distance"),
                    FieldSchema::AnyOf(vec![
                        FieldSchema::Literal("eye_to_target"),
                        FieldSchema::float(Some(0.0), None),
                    ]),
                );
        }

        for scene in ["scenes.*", "active_scene"] {
            let field = |name: &str| format!("{}.{}", scene, name);
            rules = rules
                .with_rule(&field("geometrics"), FieldSchema::Array(Box::new(FieldSchema::reference())))
                .with_rule(&field("use_bvh"), FieldSchema::Bool)
                .with_rule(&field("camera"), FieldSchema::reference())
                .with_rule(&field("background_color"), vec3());
        }

        rules = rules
            .with_rule("geometrics.*.type", FieldSchema::one_of(GEOMETRIC_TAGS))
            .with_rule("geometrics.*.material", FieldSchema::reference())
            .with_rule("geometrics.*.geometric", FieldSchema::reference())
            .with_rule(
                "geometrics.*.geometrics",
                FieldSchema::Array(Box::new(FieldSchema::reference())),
            )
            .with_rule("geometrics.*.reflectance_texture", FieldSchema::reference())
            .with_rule("geometrics.*.radius", FieldSchema::float(Some(0.0), None))
            .with_rule("geometrics.*.density", FieldSchema::float(Some(0.0), None))
            .with_rule("geometrics.*.scale", FieldSchema::float(None, None))
            .with_rule("geometrics.*.degrees", FieldSchema::float(None, None))
            .with_rule("geometrics.*.radians", FieldSchema::float(None, None))
            .with_rule("geometrics.*.filename", FieldSchema::name())
            .with_rule("geometrics.*.is_culled", FieldSchema::Bool)
            .with_rule("geometrics.*.use_bvh", FieldSchema::Bool)
            .with_rule("geometrics.*.recalculate_normals", FieldSchema::Bool);
        for point in [
            "a", "b", "c", "a_normal", "b_normal", "c_normal", "center", "lower_left", "u", "v",
            "origin", "around", "translation",
        ] {
            rules = rules.with_rule(&format!("geometrics.*.{}", point), vec3());
        }

        rules
            .with_rule("materials.*.type", FieldSchema::one_of(MATERIAL_TAGS))
            .with_rule("materials.*.reflectance_texture", FieldSchema::reference())
            .with_rule("materials.*.emittance_texture", FieldSchema::reference())
            .with_rule("materials.*.roughness", FieldSchema::float(Some(0.0), Some(1.0)))
            .with_rule("materials.*.index_of_refraction", FieldSchema::float(Some(0.0), None))
            .with_rule("textures.*.type", FieldSchema::one_of(TEXTURE_TAGS))
            .with_rule("textures.*.color", vec3())
            .with_rule("textures.*.scale", FieldSchema::float(None, None))
            .with_rule("textures.*.even_texture", FieldSchema::reference())
            .with_rule("textures.*.odd_texture", FieldSchema::reference())
            .with_rule("textures.*.filename", FieldSchema::name())
            .with_rule("textures.*.gamma", FieldSchema::float(Some(0.0), None))
    }

    /// Check the value at `path` inside `form`.
    ///
    /// An object is checked field by field, so a whole new entry is held to
    /// the same rules as its individual fields.
    pub fn check(&self, form: &Value, path: &FormPath) -> RuleResult {
        let value = match mutate::read(form, path) {
            Ok(value) => value,
            Err(PathError::NotFound { .. }) => return Err(RuleViolation::Required),
            Err(err) => return Err(RuleViolation::Custom(err.to_string())),
        };
        self.check_value(form, path, value)
    }

    fn check_value(&self, form: &Value, path: &FormPath, value: &Value) -> RuleResult {
        let Some((last, _)) = path.split_last() else {
            return Ok(());
        };
        let indexed = last.index.is_some();
        let field_name = last.key.as_str();

        if let Some(rule) = self.rules.iter().find(|rule| rule.matches(path)) {
            let schema = if indexed {
                rule.schema.element()
            } else {
                Some(&rule.schema)
            };
            if let Some(schema) = schema {
                schema.validate(field_name, value)?;
            }
            if let (Some(bound), false) = (&rule.at_most, indexed) {
                check_bound(form, field_name, value, bound)?;
            }
        }

        if let (Some(object), false) = (value.as_object(), indexed) {
            for (key, child) in object {
                self.check_value(form, &path.child(key.as_str()), child)?;
            }
        }
        Ok(())
    }
}

fn check_bound(form: &Value, field_name: &str, value: &Value, bound: &str) -> RuleResult {
    let Ok(bound_path) = FormPath::parse(bound) else {
        return Ok(());
    };
    let (Ok(limit), Some(items)) = (mutate::read(form, &bound_path), value.as_array()) else {
        return Ok(());
    };
    let Some(limits) = limit.as_array() else {
        return Ok(());
    };

    for (item, limit) in items.iter().zip(limits) {
        if let (Some(item), Some(limit)) = (item.as_float(), limit.as_float()) {
            if item > limit {
                return Err(RuleViolation::Custom(format!(
                    "'{}' cannot be larger than '{}'",
                    field_name, bound
                )));
            }
        }
    }
    Ok(())
}

/// Oracle validating paths against a snapshot of the candidate form
pub struct SchemaOracle {
    form: Value,
    rules: FieldRules,
}

impl SchemaOracle {
    pub fn new(form: Value, rules: FieldRules) -> Self {
        Self { form, rules }
    }

    /// Oracle using the render config editing constraints
    pub fn render_config(form: Value) -> Self {
        Self::new(form, FieldRules::render_config())
    }

    pub fn form(&self) -> &Value {
        &self.form
    }

    /// Check a path synchronously
    pub fn check_now(&self, path: &str) -> Option<String> {
        let parsed = match FormPath::parse(path) {
            Ok(parsed) => parsed,
            Err(err) => return Some(err.to_string()),
        };
        self.rules
            .check(&self.form, &parsed)
            .err()
            .map(|violation| violation.to_string())
    }
}

#[async_trait]
impl ValidityOracle for SchemaOracle {
    async fn check(&self, path: &str) -> Option<String> {
        self.check_now(path)
    }
}
