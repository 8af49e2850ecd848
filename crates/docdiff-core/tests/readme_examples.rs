use docdiff_core::{compare_with_options, try_compare, CompareOptions, Format, LineKind};

#[test]
fn readme_quickstart() -> Result<(), Box<dyn std::error::Error>> {
    let options: CompareOptions = serde_json::from_str(r#"{"maxLines":5000}"#)?;
    let result = compare_with_options(
        r#"{"service":"api","replicas":2}"#,
        r#"{"replicas":3,"service":"api"}"#,
        Format::Json,
        &options,
    );

    assert!(!result.equal);
    for line in result.lines.iter().filter(|line| line.kind != LineKind::Same) {
        println!("{:?}: {:?} -> {:?}", line.kind, line.left, line.right);
    }
    assert_eq!(result.stats.changed, 1);
    Ok(())
}

#[test]
fn readme_typed_errors() -> Result<(), Box<dyn std::error::Error>> {
    let options = CompareOptions::default().with_max_lines(Some(100))?;
    let comparison = try_compare("<a><b/></a>", "<a>\n  <b/>\n</a>", Format::Xml, &options)?;
    assert!(comparison.is_equal());

    let err = try_compare("<a>", "<a/>", Format::Xml, &options).unwrap_err();
    println!("{err}");
    Ok(())
}
