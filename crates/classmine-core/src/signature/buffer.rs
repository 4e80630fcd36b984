/// Accumulates one canonical type string.
///
/// A buffer belongs to exactly one grammar frame. Class names, inner-class
/// suffixes and generic arguments are appended as the frame is parsed;
/// `finish` renders the pending argument list, array dimensions and wildcard
/// bound around the base text.
#[derive(Debug, Default)]
pub(crate) struct SignatureBuffer {
    result: String,
    args: Vec<String>,
    dimensions: usize,
    wildcard: Option<char>,
}

impl SignatureBuffer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Buffer for a `+`/`-` bounded type argument.
    pub(crate) fn bounded(wildcard: char) -> Self {
        Self {
            wildcard: Some(wildcard),
            ..Self::default()
        }
    }

    pub(crate) fn add_dimension(&mut self) {
        self.dimensions += 1;
    }

    pub(crate) fn base_type(&mut self, name: &str) {
        self.result.push_str(name);
    }

    pub(crate) fn type_variable(&mut self, name: &str) {
        self.result.push('<');
        self.result.push_str(name);
        self.result.push('>');
    }

    pub(crate) fn class_type(&mut self, internal_name: &str) {
        self.result.push_str(&internal_name.replace('/', "."));
    }

    pub(crate) fn inner_class_type(&mut self, name: &str) {
        self.result.push('$');
        self.result.push_str(name);
    }

    pub(crate) fn add_argument(&mut self, arg: String) {
        self.args.push(arg);
    }

    pub(crate) fn finish(self) -> String {
        let mut out = self.result;
        if !self.args.is_empty() {
            out.push('<');
            out.push_str(&self.args.join(","));
            out.push('>');
        }
        for _ in 0..self.dimensions {
            out.push_str("[]");
        }
        match self.wildcard {
            Some(w) => format!("<?{}{}>", w, out),
            None => out,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arguments_then_dimensions() {
        let mut buffer = SignatureBuffer::new();
        buffer.add_dimension();
        buffer.class_type("java/util/Map");
        buffer.inner_class_type("Entry");
        buffer.add_argument("java.lang.String".to_string());
        buffer.add_argument("<V>".to_string());
        assert_eq!(buffer.finish(), "java.util.Map$Entry<java.lang.String,<V>>[]");
    }

    #[test]
    fn test_wildcard_wraps_result() {
        let mut buffer = SignatureBuffer::bounded('-');
        buffer.class_type("java/lang/Number");
        assert_eq!(buffer.finish(), "<?-java.lang.Number>");
    }
}
