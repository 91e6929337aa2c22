//! Patient data input form.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use zeroize::Zeroize;

use crate::domain::{
    ChestPainType, PatientRecord, RestingEcg, Sex, StSlope, ThalStatus, FEATURE_COUNT,
};
use crate::tui::styles::ClinicTheme;

/// Widget kind behind one form field.
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// Free numeric input with widget range constraints.
    Numeric { value: String, min: f64, max: f64 },
    /// Closed categorical selection; each option carries the integer
    /// code the model was trained with.
    Choice {
        options: Vec<(&'static str, u8)>,
        selected: usize,
    },
}

/// Form field definition
#[derive(Debug, Clone)]
pub struct FormField {
    pub label: &'static str,
    pub hint: &'static str,
    pub kind: FieldKind,
}

impl FormField {
    fn numeric(label: &'static str, hint: &'static str, default: &str, min: f64, max: f64) -> Self {
        Self {
            label,
            hint,
            kind: FieldKind::Numeric {
                value: default.to_string(),
                min,
                max,
            },
        }
    }

    fn choice(label: &'static str, hint: &'static str, options: Vec<(&'static str, u8)>) -> Self {
        Self {
            label,
            hint,
            kind: FieldKind::Choice {
                options,
                selected: 0,
            },
        }
    }
}

/// Predictor form state.
///
/// Fields are ordered exactly as the classifier's feature vector; a
/// bare submit is always a complete record because every widget carries
/// a default.
pub struct PredictorFormState {
    pub fields: Vec<FormField>,
    pub selected_field: usize,
    pub error_message: Option<String>,
}

impl Default for PredictorFormState {
    fn default() -> Self {
        Self {
            fields: vec![
                FormField::numeric("Age", "years (1-120)", "25", 1.0, 120.0),
                FormField::choice(
                    "Sex",
                    "[←→] select",
                    Sex::VARIANTS.iter().map(|v| (v.label(), v.code())).collect(),
                ),
                FormField::choice(
                    "Chest Pain Type",
                    "[←→] select",
                    ChestPainType::VARIANTS
                        .iter()
                        .map(|v| (v.label(), v.code()))
                        .collect(),
                ),
                FormField::numeric("Resting Blood Pressure", "mmHg (90-200)", "120", 90.0, 200.0),
                FormField::numeric("Cholesterol", "mg/dL (100-600)", "250", 100.0, 600.0),
                FormField::choice(
                    "Fasting Blood Sugar > 120 mg/dl",
                    "[←→] select",
                    vec![("False", 0), ("True", 1)],
                ),
                FormField::choice(
                    "Resting ECG Results",
                    "[←→] select",
                    RestingEcg::VARIANTS
                        .iter()
                        .map(|v| (v.label(), v.code()))
                        .collect(),
                ),
                FormField::numeric("Max Heart Rate Achieved", "bpm (70-220)", "150", 70.0, 220.0),
                FormField::choice(
                    "Exercise Induced Angina",
                    "[←→] select",
                    vec![("No", 0), ("Yes", 1)],
                ),
                FormField::numeric("ST Depression", "(0.0-6.2)", "1.0", 0.0, 6.2),
                FormField::choice(
                    "Slope of ST Segment",
                    "[←→] select",
                    StSlope::VARIANTS
                        .iter()
                        .map(|v| (v.label(), v.code()))
                        .collect(),
                ),
                FormField::numeric("Number of Major Vessels", "(0-4)", "1", 0.0, 4.0),
                FormField::choice(
                    "Thalassemia",
                    "[←→] select",
                    ThalStatus::VARIANTS
                        .iter()
                        .map(|v| (v.label(), v.code()))
                        .collect(),
                ),
            ],
            selected_field: 0,
            error_message: None,
        }
    }
}

impl PredictorFormState {
    /// Move to the next field
    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % self.fields.len();
    }

    /// Move to the previous field
    pub fn prev_field(&mut self) {
        if self.selected_field == 0 {
            self.selected_field = self.fields.len() - 1;
        } else {
            self.selected_field -= 1;
        }
    }

    /// Add a character to the current numeric field
    pub fn input_char(&mut self, c: char) {
        if let FieldKind::Numeric { value, .. } = &mut self.fields[self.selected_field].kind {
            if c.is_ascii_digit() || c == '.' {
                value.push(c);
                self.error_message = None;
            }
        }
    }

    /// Delete the last character of the current numeric field
    pub fn delete_char(&mut self) {
        if let FieldKind::Numeric { value, .. } = &mut self.fields[self.selected_field].kind {
            value.pop();
        }
    }

    /// Clear the current numeric field
    pub fn clear_field(&mut self) {
        if let FieldKind::Numeric { value, .. } = &mut self.fields[self.selected_field].kind {
            value.clear();
        }
    }

    /// Select the previous option of the current choice field
    pub fn cycle_prev(&mut self) {
        if let FieldKind::Choice { options, selected } = &mut self.fields[self.selected_field].kind
        {
            *selected = if *selected == 0 {
                options.len() - 1
            } else {
                *selected - 1
            };
            self.error_message = None;
        }
    }

    /// Select the next option of the current choice field
    pub fn cycle_next(&mut self) {
        if let FieldKind::Choice { options, selected } = &mut self.fields[self.selected_field].kind
        {
            *selected = (*selected + 1) % options.len();
            self.error_message = None;
        }
    }

    /// Wipe all input buffers from memory and reset selection.
    ///
    /// Intended to be called once a record has been submitted so raw
    /// clinical values do not persist in the UI state.
    pub fn clear_sensitive(&mut self) {
        for field in self.fields.iter_mut() {
            match &mut field.kind {
                FieldKind::Numeric { value, .. } => value.zeroize(),
                FieldKind::Choice { selected, .. } => *selected = 0,
            }
        }
        self.error_message = None;
        self.selected_field = 0;
    }

    /// Collect the widgets into a patient record, mapping categorical
    /// selections to their integer codes.
    ///
    /// # Errors
    /// Returns the first parse or range violation, labeled by field.
    pub fn to_record(&self) -> Result<PatientRecord, String> {
        let mut values = Vec::with_capacity(FEATURE_COUNT);

        for field in self.fields.iter() {
            match &field.kind {
                FieldKind::Numeric { value, min, max } => {
                    let parsed: f64 = value
                        .parse()
                        .map_err(|_| format!("{}: Invalid number", field.label))?;
                    if parsed < *min || parsed > *max {
                        return Err(format!(
                            "{}: Value must be between {} and {}",
                            field.label, min, max
                        ));
                    }
                    values.push(parsed);
                }
                FieldKind::Choice { options, selected } => {
                    values.push(f64::from(options[*selected].1));
                }
            }
        }

        PatientRecord::from_vec(&values)
    }

    /// Load the annotated high-risk sample for demonstration.
    pub fn load_sample_data(&mut self) {
        // 65yo male, asymptomatic chest pain, hypertensive, 3 vessels.
        let numeric = ["65", "180", "300", "100", "3.5", "3"];
        let choices = [0usize, 3, 1, 2, 1, 1, 1]; // sex..thal in field order
        let mut n = 0;
        let mut c = 0;
        for field in self.fields.iter_mut() {
            match &mut field.kind {
                FieldKind::Numeric { value, .. } => {
                    *value = numeric[n].to_string();
                    n += 1;
                }
                FieldKind::Choice { selected, .. } => {
                    *selected = choices[c];
                    c += 1;
                }
            }
        }
        self.error_message = None;
    }
}

/// Render the patient data input form
pub fn render_form(f: &mut Frame, area: Rect, state: &PredictorFormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Form
            Constraint::Length(3), // Footer/error
        ])
        .split(area);

    render_form_header(f, chunks[0]);
    render_form_fields(f, chunks[1], state);
    render_form_footer(f, chunks[2], state);
}

fn render_form_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", ClinicTheme::text()),
        Span::styled("Heart Disease Prediction", ClinicTheme::title()),
        Span::styled(" │ Patient Data Entry", ClinicTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(ClinicTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_form_fields(f: &mut Frame, area: Rect, state: &PredictorFormState) {
    // Two-column layout
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .margin(1)
        .split(area);

    let mid = (state.fields.len() + 1) / 2;

    render_field_column(f, columns[0], &state.fields[..mid], 0, state.selected_field);
    render_field_column(
        f,
        columns[1],
        &state.fields[mid..],
        mid,
        state.selected_field,
    );
}

fn render_field_column(
    f: &mut Frame,
    area: Rect,
    fields: &[FormField],
    offset: usize,
    selected: usize,
) {
    let field_height = 3;
    let constraints: Vec<Constraint> = fields
        .iter()
        .map(|_| Constraint::Length(field_height))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, field) in fields.iter().enumerate() {
        let is_selected = offset + i == selected;
        let border_style = if is_selected {
            ClinicTheme::border_focused()
        } else {
            ClinicTheme::border()
        };

        let title_style = if is_selected {
            ClinicTheme::focused()
        } else {
            ClinicTheme::text_secondary()
        };

        let block = Block::default()
            .title(Span::styled(format!(" {} ", field.label), title_style))
            .borders(Borders::ALL)
            .border_style(border_style);

        let content = match &field.kind {
            FieldKind::Numeric { value, .. } => {
                let value_display = if value.is_empty() {
                    Span::styled(field.hint, ClinicTheme::text_muted())
                } else {
                    Span::styled(value.as_str(), ClinicTheme::text())
                };
                Line::from(vec![
                    Span::raw(" "),
                    value_display,
                    if is_selected {
                        Span::styled("▌", ClinicTheme::focused())
                    } else {
                        Span::raw("")
                    },
                ])
            }
            FieldKind::Choice { options, selected } => {
                let marker_style = if is_selected {
                    ClinicTheme::focused()
                } else {
                    ClinicTheme::text_muted()
                };
                Line::from(vec![
                    Span::raw(" "),
                    Span::styled("‹ ", marker_style),
                    Span::styled(options[*selected].0, ClinicTheme::text()),
                    Span::styled(" ›", marker_style),
                ])
            }
        };

        f.render_widget(Paragraph::new(content).block(block), chunks[i]);
    }
}

fn render_form_footer(f: &mut Frame, area: Rect, state: &PredictorFormState) {
    let content = if let Some(err) = &state.error_message {
        Line::from(vec![
            Span::styled("! ", ClinicTheme::danger()),
            Span::styled(err.clone(), ClinicTheme::danger()),
        ])
    } else {
        Line::from(vec![
            Span::styled("[↑↓] ", ClinicTheme::key_hint()),
            Span::styled("Navigate ", ClinicTheme::key_desc()),
            Span::styled("[←→] ", ClinicTheme::key_hint()),
            Span::styled("Select ", ClinicTheme::key_desc()),
            Span::styled("[Enter] ", ClinicTheme::key_hint()),
            Span::styled("Predict ", ClinicTheme::key_desc()),
            Span::styled("[S] ", ClinicTheme::key_hint()),
            Span::styled("Sample ", ClinicTheme::key_desc()),
            Span::styled("[Esc] ", ClinicTheme::key_hint()),
            Span::styled("Quit", ClinicTheme::key_desc()),
        ])
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(ClinicTheme::border()),
    );

    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_produce_complete_record() {
        let state = PredictorFormState::default();
        let record = state.to_record().expect("Defaults should parse");
        assert!(record.validate().is_ok());

        // Widget defaults from the original tool.
        assert!((record.age - 25.0).abs() < f64::EPSILON);
        assert!((record.trestbps - 120.0).abs() < f64::EPSILON);
        assert!((record.chol - 250.0).abs() < f64::EPSILON);
        assert!((record.thalach - 150.0).abs() < f64::EPSILON);
        assert!((record.oldpeak - 1.0).abs() < f64::EPSILON);
        assert!((record.ca - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_field_navigation_wraps() {
        let mut state = PredictorFormState::default();
        assert_eq!(state.selected_field, 0);

        state.prev_field();
        assert_eq!(state.selected_field, FEATURE_COUNT - 1);
        state.next_field();
        assert_eq!(state.selected_field, 0);
    }

    #[test]
    fn test_choice_cycling_maps_codes() {
        let mut state = PredictorFormState::default();

        // Field 1 is sex; default option is Male (code 1).
        state.selected_field = 1;
        let record = state.to_record().expect("Should parse");
        assert!((record.sex - 1.0).abs() < f64::EPSILON);

        state.cycle_next();
        let record = state.to_record().expect("Should parse");
        assert!((record.sex - 0.0).abs() < f64::EPSILON);

        // Cycling past the end wraps back to the first option.
        state.cycle_next();
        let record = state.to_record().expect("Should parse");
        assert!((record.sex - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_numeric_input_rejects_letters() {
        let mut state = PredictorFormState::default();
        state.clear_field();
        state.input_char('6');
        state.input_char('x');
        state.input_char('5');

        let record = state.to_record().expect("Should parse");
        assert!((record.age - 65.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_out_of_range_value_is_rejected() {
        let mut state = PredictorFormState::default();
        state.clear_field();
        state.input_char('3');
        state.input_char('0');
        state.input_char('0');

        let err = state.to_record().expect_err("Should reject");
        assert!(err.contains("Age"));
    }

    #[test]
    fn test_sample_data_is_the_annotated_high_risk_case() {
        let mut state = PredictorFormState::default();
        state.load_sample_data();

        let record = state.to_record().expect("Sample should parse");
        let expected = [
            65.0, 1.0, 3.0, 180.0, 300.0, 1.0, 2.0, 100.0, 1.0, 3.5, 2.0, 3.0, 2.0,
        ];
        assert_eq!(record.to_vec(), expected);
    }

    #[test]
    fn test_clear_sensitive_wipes_buffers() {
        let mut state = PredictorFormState::default();
        state.load_sample_data();
        state.selected_field = 5;

        state.clear_sensitive();

        assert_eq!(state.selected_field, 0);
        for field in &state.fields {
            match &field.kind {
                FieldKind::Numeric { value, .. } => assert!(value.is_empty()),
                FieldKind::Choice { selected, .. } => assert_eq!(*selected, 0),
            }
        }
    }
}
