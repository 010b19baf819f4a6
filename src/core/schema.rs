/// Documentation for one field of an input record, generated by `#[derive(FieldDocs)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDoc {
    pub name: &'static str,
    pub required: bool,
    pub description: &'static str,
}
