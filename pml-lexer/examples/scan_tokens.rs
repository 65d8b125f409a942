//! Scanner example.
//!
//! Walks a PML snippet with the cursor and prints every token with its
//! position. Operators that share a prefix are told apart with
//! `consume_longest`; anything else is tried as a parameter, then as single
//! punctuation.

use pml_lexer::{Cursor, Token};

const OPERATORS: [Token; 5] = [
    Token::Identity,
    Token::StageBegin,
    Token::CallbackEnd,
    Token::Chain,
    Token::DoubleColon,
];

fn main() {
    let source = "\
# strafe with a small deadband
gamepad1.left_x :: always |-> deadband(0.05) -> scaling(-1,1,0,2) ->| strafe,
                :: |->| log;
";

    let mut cursor = Cursor::new(source);
    while !cursor.at_end() {
        let position = cursor.position();
        if let Some((token, text)) = cursor.consume_longest(&OPERATORS) {
            println!("{position}\t{token}\t{text}");
        } else if let Some(text) = cursor.consume_pattern(&Token::Parameter) {
            println!("{position}\t{}\t{text}", Token::Parameter);
        } else if let Some(ch) = cursor.advance() {
            println!("{position}\tpunctuation\t{ch}");
        }
    }
}
