//! Build script for minifying the embedded client script.

use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;
use std::fs;
use std::path::Path;

const EVENT_SOURCE_URL_PLACEHOLDER: &str = "EVENT_SOURCE_URL";

fn main() {
    let out_dir = std::env::var("OUT_DIR").unwrap();
    let out_path = Path::new(&out_dir);

    minify_client_js_file("src/embed/client.js", &out_path.join("client.min.js"));

    println!("cargo:rerun-if-changed=src/embed/client.js");
}

fn minify_js(source: &str) -> String {
    let allocator = Allocator::default();
    let source_type = SourceType::mjs();

    let ret = Parser::new(&allocator, source, source_type).parse();
    assert!(ret.errors.is_empty(), "Parse errors: {:?}", ret.errors);

    let mut program = ret.program;
    let options = MinifierOptions {
        mangle: Some(MangleOptions::default()),
        compress: Some(CompressOptions::smallest()),
    };
    let ret = Minifier::new(options).minify(&allocator, &mut program);

    Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(&program)
        .code
}

fn minify_client_js_file(input: &str, output: &Path) {
    let source = fs::read_to_string(input).expect("Failed to read client.js");
    assert_placeholder_once(&source, "client.js");

    let code = minify_js(&source);
    assert_placeholder_once(&code, "minified client.js");

    fs::write(output, code).expect("Failed to write minified client JS");
}

fn assert_placeholder_once(source: &str, name: &str) {
    let count = source.matches(EVENT_SOURCE_URL_PLACEHOLDER).count();
    assert_eq!(
        count, 1,
        "{} must contain exactly one {} placeholder",
        name, EVENT_SOURCE_URL_PLACEHOLDER
    );
}
