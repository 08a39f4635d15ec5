//! This is a parser for JSON.
//! Run it with the following command:
//! cargo run --example json -- demos/sample.json
//!
//! Pass `--trace` after the file name to also print the trace of named scopes.

use ariadne::{Color, Fmt, Label, Report, ReportKind, Source};
use parsify::prelude::*;
use std::{env, fs};

#[derive(Clone, Debug)]
enum Json {
    Null,
    Bool(bool),
    Str(String),
    Num(f64),
    Array(Vec<Json>),
    Object(Vec<(String, Json)>),
}

fn parser() -> Boxed {
    recursive(|value| {
        let member = seq((string_lit("\""), ":", cut(), value))
            .map(|n| {
                let key = n.children[0].take_value::<String>().unwrap_or_default();
                let value = n.children[3].take_value::<Json>().unwrap_or(Json::Null);
                n.set_value((key, value));
            })
            .debug("member");

        let object = seq(("{", cut(), zero_or_more(member).separated_by(","), "}"))
            .map(|n| {
                let members = n.children[2]
                    .children
                    .iter_mut()
                    .filter_map(|m| m.take_value::<(String, Json)>())
                    .collect();
                n.set_value(Json::Object(members));
            })
            .debug("object");

        let array = seq(("[", cut(), zero_or_more(value).separated_by(","), "]"))
            .map(|n| {
                let items = n.children[2]
                    .children
                    .iter_mut()
                    .filter_map(|v| v.take_value::<Json>())
                    .collect();
                n.set_value(Json::Array(items));
            })
            .debug("array");

        let string = string_lit("\"").map(|n| {
            let s = n.take_value::<String>().unwrap_or_default();
            n.set_value(Json::Str(s));
        });

        let number = number_lit().map(|n| {
            let x = match n.take_value::<i64>() {
                Some(int) => int as f64,
                None => n.take_value::<f64>().unwrap_or(f64::NAN),
            };
            n.set_value(Json::Num(x));
        });

        any((
            object,
            array,
            string,
            number,
            bind("true", Json::Bool(true)),
            bind("false", Json::Bool(false)),
            bind("null", Json::Null),
        ))
    })
}

fn main() {
    let mut args = env::args().skip(1);
    let path = args.next().expect("Expected file argument");
    let trace = args.any(|arg| arg == "--trace");
    let src = fs::read_to_string(path).expect("Failed to read file");

    let (result, verbose) = parser().parse_verbose(&src);
    if trace {
        print!("{}", verbose);
        for (name, (calls, failures)) in verbose.stats() {
            println!("{}: {} calls, {} failed", name, calls, failures);
        }
    }

    let err = match result {
        Ok(mut node) => {
            println!("{:#?}", node.take_value::<Json>());
            return;
        }
        Err(err) => err,
    };

    let (span, message, label) = match &err {
        RunError::Failed(e) => {
            let end = (e.pos() + 1).min(src.len());
            (
                e.pos()..end.max(e.pos()),
                "Unexpected input".to_string(),
                format!("Expected {}", e.expected().fg(Color::Green)),
            )
        }
        RunError::Unparsed { pos, .. } => (
            *pos..src.len(),
            "Trailing input".to_string(),
            "Expected end of input".to_string(),
        ),
    };

    Report::build(ReportKind::Error, span.clone())
        .with_code(3)
        .with_message(message)
        .with_label(Label::new(span).with_message(label).with_color(Color::Red))
        .finish()
        .print(Source::from(&src))
        .unwrap();
}
