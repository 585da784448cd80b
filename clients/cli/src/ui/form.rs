//! Detail modal state: the create/edit form of a single record.
//!
//! Input is sanitised as it is typed (digits fields drop anything else) and the
//! whole form is validated before a request is built. A form that fails
//! validation never reaches the network.

use crate::tax::{decimal_only, digits_only, parse_amount};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("El campo \"{0}\" es obligatorio.")]
    Required(&'static str),

    #[error("El campo \"{label}\" debe tener {expected} caracteres.")]
    ExactLength { label: &'static str, expected: usize },

    #[error("El campo \"{label}\" admite como máximo {max} caracteres.")]
    TooLong { label: &'static str, max: usize },

    #[error("El campo \"{0}\" debe ser una fecha AAAA-MM-DD.")]
    InvalidDate(&'static str),

    #[error("El campo \"{0}\" debe ser un monto válido.")]
    InvalidAmount(&'static str),

    #[error("El campo \"{0}\" tiene un valor no permitido.")]
    InvalidChoice(&'static str),

    #[error("El campo \"{label}\" debe estar entre {min} y {max}.")]
    OutOfRange {
        label: &'static str,
        min: i64,
        max: i64,
    },

    #[error("No se pudo preparar la solicitud: {0}")]
    Encode(String),
}

/// Current text of every field, by wire key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues(BTreeMap<&'static str, String>);

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &'static str, value: impl Into<String>) {
        self.0.insert(key, value.into());
    }

    /// Trimmed text, empty when unset.
    pub fn get(&self, key: &str) -> &str {
        self.0.get(key).map(|v| v.trim()).unwrap_or("")
    }

    pub fn text(&self, key: &str) -> String {
        self.get(key).to_string()
    }

    pub fn opt_text(&self, key: &str) -> Option<String> {
        Some(self.get(key))
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    pub fn date(&self, key: &str, label: &'static str) -> Result<NaiveDate, FormError> {
        self.opt_date(key, label)?.ok_or(FormError::Required(label))
    }

    pub fn opt_date(&self, key: &str, label: &'static str) -> Result<Option<NaiveDate>, FormError> {
        match self.get(key) {
            "" => Ok(None),
            raw => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map(Some)
                .map_err(|_| FormError::InvalidDate(label)),
        }
    }

    pub fn amount(&self, key: &str, label: &'static str) -> Result<Decimal, FormError> {
        parse_amount(self.get(key)).ok_or(FormError::InvalidAmount(label))
    }

    pub fn opt_amount(&self, key: &str, label: &'static str) -> Result<Option<Decimal>, FormError> {
        match self.get(key) {
            "" => Ok(None),
            _ => self.amount(key, label).map(Some),
        }
    }

    pub fn choice<E: FromStr>(&self, key: &str, label: &'static str) -> Result<E, FormError> {
        self.opt_choice(key, label)?.ok_or(FormError::Required(label))
    }

    pub fn opt_choice<E: FromStr>(
        &self,
        key: &str,
        label: &'static str,
    ) -> Result<Option<E>, FormError> {
        match self.get(key) {
            "" => Ok(None),
            raw => raw.parse().map(Some).map_err(|_| FormError::InvalidChoice(label)),
        }
    }

    pub fn number(&self, key: &str, label: &'static str) -> Result<i64, FormError> {
        self.opt_number(key, label)?.ok_or(FormError::Required(label))
    }

    pub fn opt_number(&self, key: &str, label: &'static str) -> Result<Option<i64>, FormError> {
        match self.get(key) {
            "" => Ok(None),
            raw => raw
                .parse()
                .map(Some)
                .map_err(|_| FormError::InvalidChoice(label)),
        }
    }
}

/// When a field must be filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Optional,
    Always,
    /// Only when creating; a blank value on edit keeps the stored one.
    OnCreate,
}

#[derive(Clone, Copy)]
pub enum FieldKind {
    Text,
    /// Typed text is masked on screen.
    Secret,
    Digits,
    Decimal,
    Date,
    /// One of a closed list, cycled with the arrow keys.
    Choice(fn() -> Vec<&'static str>),
    /// Read-only, recomputed from the other fields after every edit.
    Derived(fn(&FormValues) -> String),
    /// Local path of a receipt to upload after saving.
    FilePath,
}

impl std::fmt::Debug for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FieldKind::Text => "Text",
            FieldKind::Secret => "Secret",
            FieldKind::Digits => "Digits",
            FieldKind::Decimal => "Decimal",
            FieldKind::Date => "Date",
            FieldKind::Choice(_) => "Choice",
            FieldKind::Derived(_) => "Derived",
            FieldKind::FilePath => "FilePath",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub requirement: Requirement,
    pub max_len: Option<usize>,
    pub exact_len: Option<usize>,
    pub range: Option<(i64, i64)>,
}

impl FieldSpec {
    fn new(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            label,
            kind,
            requirement: Requirement::Optional,
            max_len: None,
            exact_len: None,
            range: None,
        }
    }

    pub fn text(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Text)
    }

    pub fn secret(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Secret)
    }

    pub fn digits(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Digits)
    }

    pub fn decimal(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Decimal)
    }

    pub fn date(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Date)
    }

    pub fn choice(
        key: &'static str,
        label: &'static str,
        options: fn() -> Vec<&'static str>,
    ) -> Self {
        Self::new(key, label, FieldKind::Choice(options))
    }

    pub fn derived(
        key: &'static str,
        label: &'static str,
        compute: fn(&FormValues) -> String,
    ) -> Self {
        Self::new(key, label, FieldKind::Derived(compute))
    }

    pub fn file(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::FilePath)
    }

    pub fn required(mut self) -> Self {
        self.requirement = Requirement::Always;
        self
    }

    pub fn required_on_create(mut self) -> Self {
        self.requirement = Requirement::OnCreate;
        self
    }

    pub fn max_len(mut self, max: usize) -> Self {
        self.max_len = Some(max);
        self
    }

    pub fn exact_len(mut self, len: usize) -> Self {
        self.exact_len = Some(len);
        self.max_len = Some(len);
        self
    }

    pub fn range(mut self, min: i64, max: i64) -> Self {
        self.range = Some((min, max));
        self
    }

    pub fn is_editable(&self) -> bool {
        !matches!(self.kind, FieldKind::Derived(_))
    }

    /// Sanitises a raw value the way typing into the field would.
    pub fn sanitise(&self, raw: &str) -> String {
        match self.kind {
            FieldKind::Digits => digits_only(raw, self.max_len),
            FieldKind::Decimal => decimal_only(raw),
            _ => match self.max_len {
                Some(max) => raw.chars().take(max).collect(),
                None => raw.to_string(),
            },
        }
    }

    fn validate(&self, value: &str, mode: FormMode) -> Result<(), FormError> {
        let required = match self.requirement {
            Requirement::Always => true,
            Requirement::OnCreate => mode == FormMode::Create,
            Requirement::Optional => false,
        };
        if value.is_empty() {
            return if required {
                Err(FormError::Required(self.label))
            } else {
                Ok(())
            };
        }
        let len = value.chars().count();
        if let Some(expected) = self.exact_len {
            if len != expected {
                return Err(FormError::ExactLength {
                    label: self.label,
                    expected,
                });
            }
        } else if let Some(max) = self.max_len {
            if len > max {
                return Err(FormError::TooLong {
                    label: self.label,
                    max,
                });
            }
        }
        if let Some((min, max)) = self.range {
            let in_range = value.parse::<i64>().is_ok_and(|n| (min..=max).contains(&n));
            if !in_range {
                return Err(FormError::OutOfRange {
                    label: self.label,
                    min,
                    max,
                });
            }
        }
        match self.kind {
            FieldKind::Date if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() => {
                Err(FormError::InvalidDate(self.label))
            }
            FieldKind::Decimal if parse_amount(value).is_none() => {
                Err(FormError::InvalidAmount(self.label))
            }
            FieldKind::Choice(options) if !options().iter().any(|o| *o == value) => {
                Err(FormError::InvalidChoice(self.label))
            }
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    /// Editing the record with this id; the PUT goes to `/{path}/{id}`.
    Edit(i64),
}

#[derive(Debug, Clone)]
pub struct DetailModal {
    pub title: String,
    pub mode: FormMode,
    pub fields: Vec<FieldSpec>,
    pub values: FormValues,
    pub focus: usize,
    /// Inline error; the modal stays open so the user can retry.
    pub error: Option<String>,
    pub submitting: bool,
}

impl DetailModal {
    pub fn new(
        title: impl Into<String>,
        mode: FormMode,
        fields: Vec<FieldSpec>,
        values: FormValues,
    ) -> Self {
        let mut modal = Self {
            title: title.into(),
            mode,
            fields,
            values,
            focus: 0,
            error: None,
            submitting: false,
        };
        modal.recompute_derived();
        if !modal.focused().is_some_and(FieldSpec::is_editable) {
            modal.next_field();
        }
        modal
    }

    pub fn focused(&self) -> Option<&FieldSpec> {
        self.fields.get(self.focus)
    }

    pub fn value(&self, key: &str) -> &str {
        self.values.get(key)
    }

    pub fn next_field(&mut self) {
        self.step_focus(1);
    }

    pub fn prev_field(&mut self) {
        self.step_focus(self.fields.len().saturating_sub(1));
    }

    fn step_focus(&mut self, step: usize) {
        let len = self.fields.len();
        if len == 0 {
            return;
        }
        for _ in 0..len {
            self.focus = (self.focus + step) % len;
            if self.fields[self.focus].is_editable() {
                return;
            }
        }
    }

    pub fn input_char(&mut self, c: char) {
        let Some(field) = self.focused().cloned() else {
            return;
        };
        if matches!(field.kind, FieldKind::Choice(_) | FieldKind::Derived(_)) {
            return;
        }
        let mut raw = self.values.0.get(field.key).cloned().unwrap_or_default();
        raw.push(c);
        self.values.set(field.key, field.sanitise(&raw));
        self.recompute_derived();
    }

    pub fn backspace(&mut self) {
        let Some(field) = self.focused().cloned() else {
            return;
        };
        if !field.is_editable() {
            return;
        }
        if matches!(field.kind, FieldKind::Choice(_)) {
            self.values.set(field.key, "");
        } else if let Some(raw) = self.values.0.get_mut(field.key) {
            raw.pop();
        }
        self.recompute_derived();
    }

    /// Moves a choice field to the next (or previous) option.
    pub fn cycle_choice(&mut self, forward: bool) {
        let Some(field) = self.focused().cloned() else {
            return;
        };
        let FieldKind::Choice(options) = field.kind else {
            return;
        };
        let options = options();
        if options.is_empty() {
            return;
        }
        let current = options.iter().position(|o| *o == self.values.get(field.key));
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => options.len() - 1,
            (Some(i), true) => (i + 1) % options.len(),
            (Some(i), false) => (i + options.len() - 1) % options.len(),
        };
        self.values.set(field.key, options[next]);
        self.recompute_derived();
    }

    fn recompute_derived(&mut self) {
        for field in &self.fields {
            if let FieldKind::Derived(compute) = field.kind {
                let value = compute(&self.values);
                self.values.set(field.key, value);
            }
        }
    }

    pub fn validate(&self) -> Result<(), FormError> {
        self.fields
            .iter()
            .try_for_each(|field| field.validate(self.values.get(field.key), self.mode))
    }

    /// Validates and marks the form as in flight.
    ///
    /// On a validation failure the message is stored inline and no request
    /// should be made.
    pub fn begin_submit(&mut self) -> Result<(FormMode, FormValues), FormError> {
        if let Err(err) = self.validate() {
            self.error = Some(err.to_string());
            return Err(err);
        }
        self.error = None;
        self.submitting = true;
        Ok((self.mode, self.values.clone()))
    }

    pub fn fail(&mut self, message: String) {
        self.submitting = false;
        self.error = Some(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RegimenTributario, wire_names};

    fn total(values: &FormValues) -> String {
        format!("{}!", values.get("monto"))
    }

    fn cliente_fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::digits("ruc", "RUC").required().exact_len(11),
            FieldSpec::text("razonSocial", "Razón social").required().max_len(10),
            FieldSpec::choice("regimen", "Régimen", wire_names::<RegimenTributario>).required(),
        ]
    }

    #[test]
    fn digits_field_strips_letters_and_caps_length() {
        let mut modal = DetailModal::new(
            "Cliente",
            FormMode::Create,
            cliente_fields(),
            FormValues::new(),
        );
        for c in "20a1234567890123".chars() {
            modal.input_char(c);
        }
        assert_eq!(modal.value("ruc"), "20123456789");
    }

    #[test]
    fn invalid_form_blocks_submit() {
        let values = FormValues::new()
            .with("ruc", "2012345")
            .with("razonSocial", "Bodega")
            .with("regimen", "RER");
        let mut modal = DetailModal::new("Cliente", FormMode::Create, cliente_fields(), values);

        let err = modal.begin_submit().unwrap_err();
        assert_eq!(
            err,
            FormError::ExactLength {
                label: "RUC",
                expected: 11
            }
        );
        assert!(!modal.submitting);
        assert_eq!(modal.error.as_deref(), Some("El campo \"RUC\" debe tener 11 caracteres."));
    }

    #[test]
    fn valid_form_returns_values_and_mode() {
        let values = FormValues::new()
            .with("ruc", "20123456789")
            .with("razonSocial", "Bodega")
            .with("regimen", "RER");
        let mut modal = DetailModal::new("Cliente", FormMode::Edit(4), cliente_fields(), values);

        let (mode, values) = modal.begin_submit().unwrap();
        assert_eq!(mode, FormMode::Edit(4));
        assert_eq!(values.get("regimen"), "RER");
        assert!(modal.submitting);

        modal.fail("RUC ya registrado".to_string());
        assert!(!modal.submitting);
        assert_eq!(modal.error.as_deref(), Some("RUC ya registrado"));
    }

    #[test]
    fn choice_cycles_through_options() {
        let mut modal = DetailModal::new(
            "Cliente",
            FormMode::Create,
            cliente_fields(),
            FormValues::new(),
        );
        modal.next_field();
        modal.next_field();
        modal.cycle_choice(true);
        assert_eq!(modal.value("regimen"), "NRUS");
        modal.cycle_choice(false);
        assert_eq!(modal.value("regimen"), "RMT");
        modal.input_char('x');
        assert_eq!(modal.value("regimen"), "RMT");
    }

    #[test]
    fn password_only_required_on_create() {
        let fields = vec![FieldSpec::secret("password", "Contraseña").required_on_create()];
        let create =
            DetailModal::new("Usuario", FormMode::Create, fields.clone(), FormValues::new());
        assert_eq!(create.validate(), Err(FormError::Required("Contraseña")));
        let edit = DetailModal::new("Usuario", FormMode::Edit(1), fields, FormValues::new());
        assert!(edit.validate().is_ok());
    }

    #[test]
    fn derived_fields_follow_edits_and_skip_focus() {
        let fields = vec![
            FieldSpec::derived("total", "Total", total),
            FieldSpec::decimal("monto", "Monto"),
        ];
        let mut modal = DetailModal::new("Ingreso", FormMode::Create, fields, FormValues::new());
        assert_eq!(modal.focused().map(|f| f.key), Some("monto"));
        modal.input_char('1');
        modal.input_char('.');
        modal.input_char('.');
        modal.input_char('5');
        assert_eq!(modal.value("total"), "1.5!");
        modal.next_field();
        assert_eq!(modal.focused().map(|f| f.key), Some("monto"));
    }

    #[test]
    fn month_range_is_checked() {
        let fields = vec![FieldSpec::digits("mes", "Mes").required().max_len(2).range(1, 12)];
        let modal = DetailModal::new(
            "Declaración",
            FormMode::Create,
            fields,
            FormValues::new().with("mes", "13"),
        );
        assert!(matches!(modal.validate(), Err(FormError::OutOfRange { .. })));
    }
}
