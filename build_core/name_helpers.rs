//! Name transformation helpers used to generate idiomatic Rust code.
//==================================================================================NAME_HELPERS
/// Convert `SCREAMING_SNAKE_CASE` (or any `_`/space separated name) into `PascalCase`.
/// Digits in leading position are prefixed with `Val` to keep the identifier valid.
pub(crate) fn to_pascal_case(name: &str) -> String {
    let mut buffer = String::new();
    let mut capitalize_next = true;

    for c in name.chars() {
        match c {
            ' ' | '_' | '-' | '.' | '/' => {
                capitalize_next = true;
            }
            _ if buffer.is_empty() && c.is_ascii_digit() => {
                buffer.push_str("Val");
                buffer.push(c);
                capitalize_next = true;
            }
            _ if capitalize_next && c.is_ascii_alphanumeric() => {
                buffer.push(c.to_ascii_uppercase());
                capitalize_next = false;
            }
            _ if c.is_ascii_alphanumeric() => {
                buffer.push(c.to_ascii_lowercase());
            }
            _ => {}
        }
    }

    buffer
}
