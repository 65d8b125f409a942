//! Parser example.
//!
//! Parses a small document, prints each specification, the canonical form,
//! and what a syntax error looks like.

use pml_parser::{parse, serialize};

fn main() {
    let source = "\
gamepad1.left_joystick_x :: always |-> foc -> deadband(0.5) ->| strafe,
                         :: |->| log_x,
        .left_joystick_y :: |-> deadband(0.5) ->| forward;
navx.heading :: sometimes |-> smoothing -> scaling(5,6,7,8) ->| value,
             :: always |->| log;
";

    match parse(source) {
        Ok(specs) => {
            for spec in &specs {
                println!("{spec}");
            }
            println!("\nCanonical form:\n{}", serialize(&specs));
        }
        Err(error) => println!("{error}"),
    }

    println!("A broken document:");
    if let Err(error) = parse("this.causes :: an |-> error") {
        println!("{error}");
    }
}
