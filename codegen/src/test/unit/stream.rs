use crate::stream::KernelStream;

#[test]
fn test_lines_are_terminated() {
    let mut stream = KernelStream::new();
    stream.writeln("float x = 0;");
    assert_eq!(stream.source(), "float x = 0;\n");
}

#[test]
fn test_indentation_follows_depth() {
    let mut stream = KernelStream::new();
    stream.writeln("for (uint i = 0; i < n; i++) {");
    stream.push_indent();
    stream.writeln("acc += x[i];");
    stream.pop_indent();
    stream.writeln("}");
    assert_eq!(stream.source(), "for (uint i = 0; i < n; i++) {\n  acc += x[i];\n}\n");
}

#[test]
fn test_multi_line_text_is_indented_per_line() {
    let mut stream = KernelStream::new();
    stream.push_indent();
    stream.writeln("a;\nb;");
    assert_eq!(stream.source(), "  a;\n  b;\n");
}

#[test]
fn test_empty_lines_stay_empty() {
    let mut stream = KernelStream::new();
    stream.push_indent();
    stream.writeln("");
    assert_eq!(stream.source(), "\n");
}

#[test]
fn test_pop_below_zero_is_clamped() {
    let mut stream = KernelStream::new();
    stream.pop_indent();
    stream.writeln("x;");
    assert_eq!(stream.source(), "x;\n");
}

#[test]
fn test_display_shows_the_source() {
    let mut stream = KernelStream::new();
    stream.writeln("x;");
    assert_eq!(stream.to_string(), "x;\n");
}
