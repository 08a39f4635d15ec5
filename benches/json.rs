use criterion::{black_box, criterion_group, Criterion};

mod utils;

static JSON: &str = include_str!("samples/sample.json");

#[derive(Debug, Clone, PartialEq)]
pub enum Json {
    Null,
    Bool(bool),
    Str(String),
    Num(f64),
    Array(Vec<Json>),
    Object(Vec<(String, Json)>),
}

fn bench_json(c: &mut Criterion) {
    c.bench_function("json_serde", {
        move |b| b.iter(|| black_box(serde_json::from_str::<serde_json::Value>(black_box(JSON)).unwrap()))
    });

    c.bench_function("json_parsify", {
        use ::parsify::prelude::*;
        let json = grammar::json();
        move |b| {
            b.iter(|| {
                let mut node = black_box(json.parse(black_box(JSON))).unwrap();
                node.take_value::<Json>().unwrap()
            })
        }
    });

    c.bench_function("json_parsify_tree_only", {
        use ::parsify::prelude::*;
        let json = grammar::json_tree();
        move |b| b.iter(|| black_box(json.parse(black_box(JSON))).unwrap().children.len())
    });
}

criterion_group!(
    name = benches;
    config = utils::make_criterion();
    targets = bench_json
);

fn main() {
    benches();
    utils::make_criterion().final_summary();
}

mod grammar {
    use parsify::prelude::*;

    use super::Json;

    /// The grammar with every value decoded into [`Json`].
    pub fn json() -> Boxed {
        recursive(|value| {
            let member = seq((string_lit("\""), ":", cut(), value)).map(|n| {
                let key = n.children[0].take_value::<String>().unwrap();
                let value = n.children[3].take_value::<Json>().unwrap();
                n.set_value((key, value));
            });

            let object = seq(("{", cut(), zero_or_more(member).separated_by(","), "}")).map(|n| {
                let members = n.children[2]
                    .children
                    .iter_mut()
                    .map(|m| m.take_value::<(String, Json)>().unwrap())
                    .collect();
                n.set_value(Json::Object(members));
            });

            let array = seq(("[", cut(), zero_or_more(value).separated_by(","), "]")).map(|n| {
                let items = n.children[2]
                    .children
                    .iter_mut()
                    .map(|v| v.take_value::<Json>().unwrap())
                    .collect();
                n.set_value(Json::Array(items));
            });

            let string = string_lit("\"").map(|n| {
                let s = n.take_value::<String>().unwrap();
                n.set_value(Json::Str(s));
            });

            let number = number_lit().map(|n| {
                let x = match n.take_value::<i64>() {
                    Some(int) => int as f64,
                    None => n.take_value::<f64>().unwrap(),
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

    /// The same language, producing only the raw node tree.
    pub fn json_tree() -> Boxed {
        recursive(|value| {
            let member = seq((string_lit("\""), ":", cut(), value));
            let object = seq(("{", cut(), zero_or_more(member).separated_by(","), "}"));
            let array = seq(("[", cut(), zero_or_more(value).separated_by(","), "]"));
            any((object, array, string_lit("\""), number_lit(), "true", "false", "null"))
        })
    }
}
