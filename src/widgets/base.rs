#[derive(Debug, Clone)]
pub struct InputBase {
    id: String,
    label: String,
}

impl InputBase {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn focus_marker(&self, focused: bool) -> &'static str {
        if focused { ">" } else { " " }
    }

    pub fn prefixed_label(&self, focused: bool) -> String {
        format!("{} {}", self.focus_marker(focused), self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::InputBase;

    #[test]
    fn prefixed_label_marks_focus() {
        let base = InputBase::new("cep", "CEP");
        assert_eq!(base.prefixed_label(true), "> CEP");
        assert_eq!(base.prefixed_label(false), "  CEP");
    }
}
