use crate::model::{ParameterizedIdentifier, PipelineSpecification};

/// Writes specifications back out as canonical PML.
///
/// Consecutive specifications on the same device share one statement, and
/// consecutive ones on the same input share one process set. Every process
/// spells out its filter, so the output does not depend on inheritance or on
/// the parser's default filter. Parameterless names are written without
/// parentheses.
pub fn serialize(specifications: &[PipelineSpecification]) -> String {
    let mut out = String::new();
    let mut iter = specifications.iter().peekable();

    while let Some(first) = iter.next() {
        out.push_str(first.device());
        write_input(&mut out, first);

        let mut previous = first;
        while let Some(next) = iter.next_if(|next| next.device() == first.device()) {
            if next.input() == previous.input() {
                out.push_str(",\n    ");
                write_process(&mut out, next);
            } else {
                out.push_str(",\n  ");
                write_input(&mut out, next);
            }
            previous = next;
        }
        out.push_str(";\n");
    }
    out
}

fn write_input(out: &mut String, spec: &PipelineSpecification) {
    out.push('.');
    out.push_str(spec.input());
    out.push(' ');
    write_process(out, spec);
}

fn write_process(out: &mut String, spec: &PipelineSpecification) {
    out.push_str(":: ");
    write_pident(out, spec.filter());

    if spec.is_identity() {
        out.push_str(" |->| ");
        out.push_str(spec.callback());
        return;
    }
    for (i, stage) in spec.stages().iter().enumerate() {
        out.push_str(if i == 0 { " |-> " } else { " -> " });
        write_pident(out, stage);
    }
    out.push_str(" ->| ");
    out.push_str(spec.callback());
}

fn write_pident(out: &mut String, pident: &ParameterizedIdentifier) {
    out.push_str(pident.name());
    if !pident.parameters().is_empty() {
        out.push('(');
        out.push_str(&pident.parameters().join(","));
        out.push(')');
    }
}
