//! Controlled-input state for the requirement form.

use std::fmt;

use crate::error::FieldError;
use crate::parse::{parse_budget, parse_program_id, parse_required_text};
use crate::types::{Requirement, RequirementPayload};

/// The four inputs of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Title,
    Description,
    ProgramId,
    Budget,
}

impl FormField {
    pub const ALL: [FormField; 4] = [FormField::Title, FormField::Description, FormField::ProgramId, FormField::Budget];

    pub fn required(self) -> bool {
        !matches!(self, FormField::Budget)
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormField::Title => "title",
            FormField::Description => "description",
            FormField::ProgramId => "program",
            FormField::Budget => "budget",
        };
        f.write_str(name)
    }
}

/// Whether the form creates a new requirement or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { requirement_id: i64 },
}

/// Raw input values. Numeric inputs are kept as strings until submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub title: String,
    pub description: String,
    pub program_id: String,
    pub budget: String,
}

impl FormState {
    /// Mirror an existing requirement into input values.
    pub fn from_requirement(requirement: &Requirement) -> Self {
        Self {
            title: requirement.title.clone(),
            description: requirement.description.clone(),
            program_id: requirement.program_id.to_string(),
            budget: requirement.budget.map(format_amount).unwrap_or_default(),
        }
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Title => &self.title,
            FormField::Description => &self.description,
            FormField::ProgramId => &self.program_id,
            FormField::Budget => &self.budget,
        }
    }

    /// Replace exactly one field.
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let slot = match field {
            FormField::Title => &mut self.title,
            FormField::Description => &mut self.description,
            FormField::ProgramId => &mut self.program_id,
            FormField::Budget => &mut self.budget,
        };
        *slot = value.into();
    }

    /// Parse every field, collecting all failures rather than stopping at the
    /// first one.
    pub fn to_payload(&self) -> Result<RequirementPayload, Vec<FieldError>> {
        let mut errors = Vec::new();
        let title = parse_required_text(FormField::Title, &self.title).map_err(|e| errors.push(e)).ok();
        let description = parse_required_text(FormField::Description, &self.description)
            .map_err(|e| errors.push(e))
            .ok();
        let program_id = parse_program_id(&self.program_id).map_err(|e| errors.push(e)).ok();
        let budget = parse_budget(&self.budget).map_err(|e| errors.push(e)).ok();

        match (title, description, program_id, budget) {
            (Some(title), Some(description), Some(program_id), Some(budget)) => Ok(RequirementPayload {
                title,
                description,
                program_id,
                budget,
            }),
            _ => Err(errors),
        }
    }
}

/// `50.0` renders as `"50"`, `150.5` as `"150.5"`.
fn format_amount(amount: f64) -> String {
    amount.to_string()
}
