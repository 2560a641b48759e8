//! `{{key}}` placeholder substitution.

use super::naming::{pluralize, to_kebab_case, to_pascal_case, to_snake_case};

/// Ordered variable bindings for template rendering.
///
/// Bindings are applied in insertion order. A later binding with the same
/// key replaces the earlier value in place, so ordering stays stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderContext {
    bindings: Vec<(String, String)>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context with the casing variants every scaffold template uses.
    ///
    /// | Key      | `"UserProfile"`  |
    /// |----------|------------------|
    /// | `name`   | `UserProfile`    |
    /// | `snake`  | `user_profile`   |
    /// | `pascal` | `UserProfile`    |
    /// | `kebab`  | `user-profile`   |
    /// | `plural` | `user_profiles`  |
    pub fn for_name(name: &str) -> Self {
        let snake = to_snake_case(name);
        Self::new()
            .with("name", name)
            .with("pascal", to_pascal_case(name))
            .with("kebab", to_kebab_case(name))
            .with("plural", pluralize(&snake))
            .with("snake", snake)
    }

    /// Add or replace a binding.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.bindings.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.bindings.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.bindings
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Render `template`. Unknown placeholders stay verbatim.
    pub fn render(&self, template: &str) -> String {
        render(template, &self.bindings)
    }
}

/// Replace each `{{key}}` in `template` with its bound value.
///
/// - `{{UNKNOWN}}` stays as the literal `{{UNKNOWN}}`
/// - single braces (Python f-strings, dict literals) are untouched
pub fn render(template: &str, bindings: &[(String, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };

        let key = &after[..end];
        match bindings.iter().find(|(k, _)| k == key.trim()) {
            Some((_, value)) => out.push_str(value),
            None => {
                out.push_str("{{");
                out.push_str(key);
                out.push_str("}}");
            }
        }
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_known_placeholders() {
        let ctx = RenderContext::new().with("pascal", "Order");
        assert_eq!(
            ctx.render("class {{pascal}}(Base): ..."),
            "class Order(Base): ..."
        );
    }

    #[test]
    fn leaves_unknown_placeholders_verbatim() {
        let ctx = RenderContext::new().with("a", "1");
        assert_eq!(ctx.render("{{a}} {{missing}}"), "1 {{missing}}");
    }

    #[test]
    fn leaves_python_braces_alone() {
        let ctx = RenderContext::for_name("order");
        let src = "return f\"<{{pascal}}(id={self.id})>\"";
        assert_eq!(ctx.render(src), "return f\"<Order(id={self.id})>\"");
    }

    #[test]
    fn unterminated_placeholder_is_copied() {
        let ctx = RenderContext::new().with("a", "1");
        assert_eq!(ctx.render("x {{a"), "x {{a");
    }

    #[test]
    fn repeated_and_adjacent_placeholders() {
        let ctx = RenderContext::new().with("a", "1").with("b", "2");
        assert_eq!(ctx.render("{{a}}{{b}}{{a}}"), "121");
    }

    #[test]
    fn values_are_not_rendered_again() {
        let ctx = RenderContext::new().with("a", "{{b}}").with("b", "x");
        assert_eq!(ctx.render("{{a}}"), "{{b}}");
    }

    #[test]
    fn for_name_derives_casings() {
        let ctx = RenderContext::for_name("UserProfile");
        assert_eq!(ctx.get("snake"), Some("user_profile"));
        assert_eq!(ctx.get("pascal"), Some("UserProfile"));
        assert_eq!(ctx.get("kebab"), Some("user-profile"));
        assert_eq!(ctx.get("plural"), Some("user_profiles"));
    }

    #[test]
    fn later_binding_replaces_earlier() {
        let mut ctx = RenderContext::new().with("k", "old");
        ctx.set("k", "new");
        assert_eq!(ctx.get("k"), Some("new"));
        assert_eq!(ctx.render("{{k}}"), "new");
    }
}
