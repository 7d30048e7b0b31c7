//! Macro expansion through the public compile entry point.

use proptest::prelude::*;
use rstest::rstest;
use sncl_parser::{compile_source, CompileError, CompileOptions, ErrorKind};

fn compile(source: &str) -> Result<String, CompileError> {
    compile_source(source, "doc.sncl", &CompileOptions::default())
}

/// `macro m(p0, .., pN) media p0 end .. end`
fn media_macro(arity: usize) -> String {
    let params: Vec<String> = (0..arity).map(|i| format!("p{i}")).collect();
    let body: String = params.iter().map(|p| format!("  media {p} end\n")).collect();
    format!("macro m({})\n{}end\n", params.join(", "), body)
}

fn call(arguments: &[String]) -> String {
    let quoted: Vec<String> = arguments.iter().map(|a| format!("\"{a}\"")).collect();
    format!("m({})\n", quoted.join(", "))
}

#[rstest]
#[case(1, 0)]
#[case(1, 2)]
#[case(3, 2)]
#[case(0, 1)]
fn wrong_arity_is_rejected(#[case] declared: usize, #[case] passed: usize) {
    let arguments: Vec<String> = (0..passed).map(|i| format!("a{i}")).collect();
    let source = format!("{}{}", media_macro(declared), call(&arguments));
    let err = compile(&source).unwrap_err();
    assert_eq!(
        err.kind,
        ErrorKind::ArityMismatch {
            macro_id: "m".to_string(),
            expected: declared,
            found: passed,
        }
    );
}

#[rstest]
#[case::string("\"intro.mp4\"", "intro.mp4")]
#[case::number("10", "10")]
#[case::percentage("50%", "50%")]
#[case::unit("5s", "5s")]
#[case::color("#fff", "#fff")]
fn literal_arguments_are_substituted(#[case] argument: &str, #[case] expected: &str) {
    let source = format!("macro m(v)\n  media clip src: v end\nend\nm({argument})\n");
    let output = compile(&source).unwrap();
    assert!(
        output.contains(&format!("<media id=\"clip\" src=\"{expected}\">")),
        "unexpected output:\n{output}"
    );
}

#[test]
fn non_parameter_text_passes_through() {
    let source = "macro m(v)\n  media v src: \"fixed.png\" end\nend\nm(\"a\")\n";
    let output = compile(source).unwrap();
    assert!(output.contains("<media id=\"a\" src=\"fixed.png\">"));
}

#[test]
fn expanded_elements_follow_top_level_elements() {
    let source = "macro m(v)\n  media v end\nend\nm(\"late\")\nmedia early end\n";
    let output = compile(source).unwrap();
    assert!(output.find("id=\"early\"").unwrap() < output.find("id=\"late\"").unwrap());
}

#[test]
fn expanded_contexts_and_regions() {
    let source = r#"
macro scene(name, place, file)
  region place end
  context name
    media clip src: file rg: place end
    port entry clip
  end
end
scene("intro", "top", "a.mp4")
scene("outro", "bottom", "b.mp4")
"#;
    let err = compile(source).unwrap_err();
    // body ids are global, so the second scene collides with the first
    assert!(matches!(err.kind, ErrorKind::IdentifierAlreadyExists(_)));

    let single = source.replace("scene(\"outro\", \"bottom\", \"b.mp4\")\n", "");
    let output = compile(&single).unwrap();
    assert!(output.contains("<region id=\"top\" />"));
    assert!(output.contains("<descriptor id=\"__desc__top\" region=\"top\" />"));
    assert!(output.contains("<context id=\"intro\">"));
    assert!(output.contains("<port id=\"entry\" component=\"clip\" />"));
}

#[test]
fn forwarding_sees_only_the_enclosing_macro() {
    let source = r#"
macro inner(x)
  media x end
end
macro middle(y)
  inner(y)
end
macro outer(z)
  middle(z)
  inner(z)
end
outer("shared")
"#;
    let err = compile(source).unwrap_err();
    assert_eq!(err.kind, ErrorKind::IdentifierAlreadyExists("shared".to_string()));

    let source = r#"
macro inner(x)
  media x end
end
macro outer(z)
  inner(y)
end
outer("v")
"#;
    let err = compile(source).unwrap_err();
    assert_eq!(
        err.kind,
        ErrorKind::InvalidArgument {
            argument: "y".to_string(),
            macro_id: Some("outer".to_string()),
        }
    );
}

#[test]
fn duplicate_parameters_and_macros() {
    let err = compile("macro m(a, a) end\n").unwrap_err();
    assert_eq!(err.kind, ErrorKind::DuplicateParameter("a".to_string()));

    let err = compile("macro m(a) end\nmacro m(b) end\n").unwrap_err();
    assert_eq!(err.kind, ErrorKind::MacroAlreadyExists("m".to_string()));
    assert_eq!(err.line, 2);
}

#[test]
fn self_recursion_is_bounded() {
    let options = CompileOptions {
        max_macro_depth: 16,
        ..CompileOptions::default()
    };
    let err = compile_source("macro m(a)\n  m(a)\nend\nm(\"x\")\n", "doc.sncl", &options)
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::ExpansionDepthExceeded(16, "m".to_string()));
}

fn arguments(arity: usize) -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec("[a-z]{1,8}", arity).prop_map(|names| {
        names
            .into_iter()
            .enumerate()
            .map(|(i, name)| format!("v{i}_{name}"))
            .collect()
    })
}

fn sncl_word() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "port", "media", "region", "context", "area", "macro", "end", "do", "onBegin",
        "onEnd", "onSelection", "start", "stop", "set", "a", "b", "m", "rg", "src", ":",
        ",", ".", "(", ")", "\"s\"", "10", "5s", "50%", "#abc", "RED",
    ])
}

proptest! {
    #[test]
    fn exact_arity_substitutes_every_parameter(
        args in (0usize..6).prop_flat_map(arguments)
    ) {
        let source = format!("{}{}", media_macro(args.len()), call(&args));
        let output = compile(&source).unwrap();
        for argument in &args {
            let expected = format!("<media id=\"{}\">", argument);
            prop_assert!(output.contains(&expected));
        }
    }

    #[test]
    fn compiling_is_deterministic(count in 1usize..8, linked in any::<bool>()) {
        let mut source = String::from("region screen end\n");
        for i in 0..count {
            source.push_str(&format!("media m{i} rg: screen end\n"));
        }
        if linked {
            source.push_str("onBegin m0 do start m0 end end\n");
        }
        let first = compile(&source).unwrap();
        let second = compile(&source).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn arbitrary_token_soup_never_panics(
        words in proptest::collection::vec(sncl_word(), 0..40)
    ) {
        let source = words.join(" ");
        let _ = compile(&source);
    }
}
