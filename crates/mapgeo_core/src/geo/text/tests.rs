use crate::geo::TextWriter;

#[test]
fn lines_end_with_crlf() {
	let mut writer = TextWriter::new(Vec::new());
	writer.write_line("g default").expect("line writes");
	writer.blank_lines(2).expect("blank lines write");
	writer.write_line(format_args!("v {} {}", 1, 2)).expect("formatted line writes");
	writer.write_raw(b"f 1\r\n").expect("raw bytes write");

	let bytes = writer.finish().expect("writer flushes");
	assert_eq!(bytes, b"g default\r\n\r\n\r\nv 1 2\r\nf 1\r\n");
}
