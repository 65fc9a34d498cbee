/// Quick-start topics offered under the input.
pub const SUGGESTIONS: [&str; 4] = [
    "Neon Party",
    "Rustic Wedding",
    "Tech Launch",
    "Sunday Barbecue",
];

#[derive(Debug, Default)]
pub struct TopicForm {
    pub input: String,
    suggestion: Option<usize>,
}

impl TopicForm {
    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn newline(&mut self) {
        self.input.push('\n');
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    /// Replaces the input with the next suggestion. Never submits.
    pub fn cycle_suggestion(&mut self) {
        let next = self.suggestion.map_or(0, |i| (i + 1) % SUGGESTIONS.len());
        self.apply_suggestion(next);
    }

    pub fn apply_suggestion(&mut self, index: usize) {
        if let Some(suggestion) = SUGGESTIONS.get(index) {
            self.suggestion = Some(index);
            self.input = (*suggestion).to_string();
        }
    }

    pub const fn selected_suggestion(&self) -> Option<usize> {
        self.suggestion
    }

    pub fn can_submit(&self, is_loading: bool) -> bool {
        !is_loading && !self.input.trim().is_empty()
    }

    /// The topic to generate from, passed through untrimmed.
    pub fn submit(&self, is_loading: bool) -> Option<String> {
        self.can_submit(is_loading).then(|| self.input.clone())
    }
}
