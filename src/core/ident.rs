use nom::bytes::complete::tag;
use nom::character::complete::{char, digit1, multispace0};
use nom::combinator::{all_consuming, opt, recognize};
use nom::multi::separated_list1;
use nom::sequence::{delimited, preceded};
use nom::{IResult, Parser};

/// Bare item id: `Q` followed by digits
fn item_id(input: &str) -> IResult<&str, &str> {
    recognize((char('Q'), digit1)).parse(input)
}

/// Item id in SPARQL prefixed form: `wd:Q123`
pub fn prefixed_item_id(input: &str) -> IResult<&str, &str> {
    preceded(tag("wd:"), item_id).parse(input)
}

/// Comma separated list of prefixed item ids, as written after
/// `wikibase:grammaticalFeature`.
pub fn prefixed_item_list(input: &str) -> IResult<&str, Vec<&str>> {
    separated_list1(delimited(multispace0, char(','), multispace0), prefixed_item_id).parse(input)
}

/// Parse a whole token as an item id, with or without the `wd:` prefix.
/// Returns the bare id. Anything else (lexeme ids, property ids, text)
/// is rejected.
pub fn parse_item_id(input: &str) -> Option<&str> {
    all_consuming(preceded(opt(tag("wd:")), item_id))
        .parse(input.trim())
        .ok()
        .map(|(_, id)| id)
}
