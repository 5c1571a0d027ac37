//! Parsers for the comma-separated lists users type in: `"A, B, C"`,
//! `"0.5, 0.3, 0.2"`, `"3, 0, 0"`.

use nom::{
    IResult, Parser,
    bytes::complete::take_while1,
    character::complete::{char, i64 as signed_integer, space0},
    combinator::all_consuming,
    multi::separated_list1,
    number::complete::double,
    sequence::delimited,
};

pub fn parse_probabilities(input: &str) -> anyhow::Result<Vec<f64>> {
    match all_consuming(probability_list).parse(input) {
        Ok((_, probabilities)) => Ok(probabilities),
        Err(_) => Err(anyhow::anyhow!(
            "Failed to parse probability list {input:?}"
        )),
    }
}

pub fn parse_frequencies(input: &str) -> anyhow::Result<Vec<i64>> {
    match all_consuming(frequency_list).parse(input) {
        Ok((_, frequencies)) => Ok(frequencies),
        Err(_) => Err(anyhow::anyhow!("Failed to parse frequency list {input:?}")),
    }
}

pub fn parse_categories(input: &str) -> anyhow::Result<Vec<String>> {
    let (_, labels) = all_consuming(category_list)
        .parse(input)
        .map_err(|_| anyhow::anyhow!("Failed to parse category list {input:?}"))?;

    let labels: Vec<String> = labels.iter().map(|label| label.trim().to_string()).collect();
    if let Some(index) = labels.iter().position(|label| label.is_empty()) {
        anyhow::bail!("Category at position {index} is empty");
    }
    Ok(labels)
}

fn separator(input: &str) -> IResult<&str, char> {
    delimited(space0, char(','), space0).parse(input)
}

fn probability_list(input: &str) -> IResult<&str, Vec<f64>> {
    delimited(space0, separated_list1(separator, double), space0).parse(input)
}

fn frequency_list(input: &str) -> IResult<&str, Vec<i64>> {
    delimited(space0, separated_list1(separator, signed_integer), space0).parse(input)
}

fn label(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c != ',').parse(input)
}

fn category_list(input: &str) -> IResult<&str, Vec<&str>> {
    separated_list1(char(','), label).parse(input)
}
