//! Function declaration encoding

use crate::catalog::{FunctionCatalog, FunctionSpec};
use crate::constants::{
    CLOSE_BRACE, CLOSE_BRACKET, DECLARATION_PREFIX, END_DECLARATION, OBJECT_TYPE, OPEN_BRACE,
    OPEN_BRACKET, START_DECLARATION,
};
use crate::encode::writer::GrammarWriter;

/// Encode one declaration block
///
/// ```text
/// <start_function_declaration>declaration:NAME{description:<escape>..<escape>,
///   parameters:{properties:{P:{description:<escape>..<escape>,type:<escape>STRING<escape>}},
///   required:[<escape>P<escape>],type:<escape>OBJECT<escape>}}<end_function_declaration>
/// ```
pub fn encode_declaration(spec: &FunctionSpec) -> String {
    let mut w = GrammarWriter::new();
    write_declaration(&mut w, spec);
    w.finish()
}

/// Encode every declaration of the catalog, in catalog order
pub fn encode_declarations(catalog: &FunctionCatalog) -> String {
    let mut w = GrammarWriter::new();
    for spec in catalog.list_specs() {
        write_declaration(&mut w, spec);
    }
    w.finish()
}

fn write_declaration(w: &mut GrammarWriter, spec: &FunctionSpec) {
    w.push_str(START_DECLARATION);
    w.push_str(DECLARATION_PREFIX);
    w.push_str(spec.name());

    w.open(OPEN_BRACE);
    w.escaped_field("description", spec.description());

    w.key("parameters");
    w.open(OPEN_BRACE);

    w.key("properties");
    w.open(OPEN_BRACE);
    for param in spec.parameters() {
        w.key(&param.name);
        w.open(OPEN_BRACE);
        w.escaped_field("description", &param.description);
        w.escaped_field("type", param.param_type.as_tag());
        w.close(CLOSE_BRACE);
    }
    w.close(CLOSE_BRACE);

    w.key("required");
    w.open(OPEN_BRACKET);
    for name in spec.required() {
        w.item();
        w.escaped(name);
    }
    w.close(CLOSE_BRACKET);

    w.escaped_field("type", OBJECT_TYPE);
    w.close(CLOSE_BRACE);

    w.close(CLOSE_BRACE);
    w.push_str(END_DECLARATION);
}
