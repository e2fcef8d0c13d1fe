//! Control panel input state.
//!
//! Edits are buffered per field and only pushed to the scheduler when the
//! user presses Enter or moves focus away. A rejected value snaps back to
//! the last accepted text.

use crypts_core::{FilterInputError, InputResult, ViewState};
use crypts_scheduler::SchedulerHandle;
use rust_decimal::Decimal;
use tracing::debug;

/// Focusable controls, in Tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    AutoRefresh,
    Delay,
    Rows,
    Name,
    MinPrice,
    MaxPrice,
}

impl FormField {
    pub const ORDER: [FormField; 6] = [
        Self::AutoRefresh,
        Self::Delay,
        Self::Rows,
        Self::Name,
        Self::MinPrice,
        Self::MaxPrice,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::AutoRefresh => "Auto",
            Self::Delay => "Delay (s): ",
            Self::Rows => "Rows: ",
            Self::Name => "Name: ",
            Self::MinPrice => "> Price: ",
            Self::MaxPrice => "< Price: ",
        }
    }

    pub fn is_text(&self) -> bool {
        !matches!(self, Self::AutoRefresh)
    }

    /// Whether a committed change should trigger an immediate refresh.
    pub fn refreshes_on_commit(&self) -> bool {
        matches!(self, Self::Rows | Self::Name | Self::MinPrice | Self::MaxPrice)
    }

    fn index(&self) -> usize {
        Self::ORDER.iter().position(|f| f == self).unwrap_or(0)
    }

    fn next(&self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    fn prev(&self) -> Self {
        let len = Self::ORDER.len();
        Self::ORDER[(self.index() + len - 1) % len]
    }
}

/// Pending change to push through the scheduler handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEdit {
    pub field: FormField,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
struct TextField {
    buffer: String,
    committed: String,
}

impl TextField {
    fn new(text: String) -> Self {
        Self {
            buffer: text.clone(),
            committed: text,
        }
    }

    fn is_dirty(&self) -> bool {
        self.buffer != self.committed
    }
}

/// Buffered state of the REFRESH and FILTERS panels.
#[derive(Debug, Clone)]
pub struct ControlForm {
    focus: FormField,
    delay: TextField,
    rows: TextField,
    name: TextField,
    min_price: TextField,
    max_price: TextField,
    error: Option<FilterInputError>,
}

impl ControlForm {
    pub fn from_view(view: &ViewState) -> Self {
        Self {
            focus: FormField::AutoRefresh,
            delay: TextField::new(view.refresh.delay_secs.to_string()),
            rows: TextField::new(view.filter.row_limit.to_string()),
            name: TextField::new(view.filter.name_substring.clone().unwrap_or_default()),
            min_price: TextField::new(price_text(view.filter.min_price)),
            max_price: TextField::new(price_text(view.filter.max_price)),
            error: None,
        }
    }

    pub fn focus(&self) -> FormField {
        self.focus
    }

    /// Text currently shown in a field.
    pub fn text(&self, field: FormField) -> &str {
        self.slot(field).map(|f| f.buffer.as_str()).unwrap_or_default()
    }

    /// Last rejected input, until the next successful commit.
    pub fn error(&self) -> Option<&FilterInputError> {
        self.error.as_ref()
    }

    /// Move focus forward, handing back the edit of the field being left.
    pub fn focus_next(&mut self) -> Option<FieldEdit> {
        let edit = self.take_edit();
        self.focus = self.focus.next();
        edit
    }

    pub fn focus_prev(&mut self) -> Option<FieldEdit> {
        let edit = self.take_edit();
        self.focus = self.focus.prev();
        edit
    }

    pub fn input_char(&mut self, c: char) {
        if let Some(field) = self.slot_mut(self.focus) {
            field.buffer.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.slot_mut(self.focus) {
            field.buffer.pop();
        }
    }

    pub fn clear_field(&mut self) {
        if let Some(field) = self.slot_mut(self.focus) {
            field.buffer.clear();
        }
    }

    /// The focused field's edit, if its text changed since the last commit.
    pub fn take_edit(&mut self) -> Option<FieldEdit> {
        let field = self.focus;
        let slot = self.slot(field)?;
        slot.is_dirty().then(|| FieldEdit {
            field,
            text: slot.buffer.clone(),
        })
    }

    /// Record an accepted edit, showing the normalized text.
    pub fn accept(&mut self, field: FormField, text: String) {
        if let Some(slot) = self.slot_mut(field) {
            *slot = TextField::new(text);
        }
        self.error = None;
    }

    /// Restore the last valid text and remember why.
    pub fn reject(&mut self, field: FormField, error: FilterInputError) {
        if let Some(slot) = self.slot_mut(field) {
            slot.buffer = slot.committed.clone();
        }
        self.error = Some(error);
    }

    fn slot(&self, field: FormField) -> Option<&TextField> {
        match field {
            FormField::AutoRefresh => None,
            FormField::Delay => Some(&self.delay),
            FormField::Rows => Some(&self.rows),
            FormField::Name => Some(&self.name),
            FormField::MinPrice => Some(&self.min_price),
            FormField::MaxPrice => Some(&self.max_price),
        }
    }

    fn slot_mut(&mut self, field: FormField) -> Option<&mut TextField> {
        match field {
            FormField::AutoRefresh => None,
            FormField::Delay => Some(&mut self.delay),
            FormField::Rows => Some(&mut self.rows),
            FormField::Name => Some(&mut self.name),
            FormField::MinPrice => Some(&mut self.min_price),
            FormField::MaxPrice => Some(&mut self.max_price),
        }
    }
}

/// Push an edit through the handle. Returns the normalized field text.
pub fn commit_edit(handle: &SchedulerHandle, edit: &FieldEdit) -> InputResult<String> {
    let text = match edit.field {
        FormField::AutoRefresh => return Ok(String::new()),
        FormField::Delay => handle.set_delay(&edit.text)?.to_string(),
        FormField::Rows => handle.set_row_limit(&edit.text)?.to_string(),
        FormField::Name => handle.set_name_filter(&edit.text).unwrap_or_default(),
        FormField::MinPrice => price_text(handle.set_min_price(&edit.text)?),
        FormField::MaxPrice => price_text(handle.set_max_price(&edit.text)?),
    };
    debug!(field = ?edit.field, %text, "Field committed");
    Ok(text)
}

fn price_text(price: Option<Decimal>) -> String {
    price.map(|p| p.normalize().to_string()).unwrap_or_default()
}
