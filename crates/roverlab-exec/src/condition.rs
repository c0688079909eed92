//! Condition evaluation for `if` and `while` instructions.
//!
//! Conditions are either a named world predicate (`canMoveForward`,
//! `hasItem`, ...) or a small numeric comparison over `energy` and
//! `inventorySize`. The numeric form is parsed by a tiny
//! recursive-descent evaluator over a strict character whitelist;
//! nothing here ever executes user text. Any malformed condition
//! evaluates to `false` with a warning rather than failing the run.

use roverlab_types::RobotState;
use roverlab_world::WorldModel;

/// How many items the robot can carry, as seen by `inventoryFull`.
pub const INVENTORY_CAPACITY: usize = 5;

/// Evaluate a condition string against the live world and robot state.
pub fn evaluate(condition: &str, world: &WorldModel, robot: &RobotState) -> bool {
    let trimmed = condition.trim();
    match trimmed {
        "canMoveForward" => world.is_passable(robot.ahead()),
        "isDoorAhead" => world.door_at(robot.ahead()).is_some(),
        "isDoorOpen" => world
            .door_at(robot.ahead())
            .is_some_and(|door| door.properties.is_open),
        "hasItem" => robot.has_item(),
        "inventoryFull" => robot.inventory.len() >= INVENTORY_CAPACITY,
        _ => evaluate_numeric(trimmed, robot),
    }
}

/// Substitute the two allowed variables and evaluate the remaining
/// arithmetic comparison.
fn evaluate_numeric(condition: &str, robot: &RobotState) -> bool {
    let substituted = condition
        .replace("inventorySize", &robot.inventory.len().to_string())
        .replace("energy", &format_number(robot.energy));

    if !is_whitelisted(&substituted) {
        tracing::warn!(condition, "condition contains unsupported syntax");
        return false;
    }

    match Parser::new(&substituted).parse() {
        Ok(value) => value != 0.0,
        Err(reason) => {
            tracing::warn!(condition, reason, "condition failed to parse");
            false
        }
    }
}

fn format_number(value: f64) -> String {
    // `Display` for f64 never produces exponents for the magnitudes the
    // game uses, so the output stays within the whitelist.
    format!("{value}")
}

/// After substitution only digits, decimal points, whitespace,
/// comparison and boolean operators, and parentheses may remain.
fn is_whitelisted(text: &str) -> bool {
    !text.is_empty()
        && text.chars().all(|c| {
            c.is_ascii_digit()
                || c.is_ascii_whitespace()
                || matches!(c, '.' | '<' | '>' | '=' | '!' | '&' | '|' | '(' | ')' | '-')
        })
}

// ---------------------------------------------------------------------------
// Recursive-descent evaluator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Less,
    Greater,
    LessEq,
    GreaterEq,
    Eq,
    NotEq,
    And,
    Or,
    LParen,
    RParen,
}

/// Evaluates the grammar
///
/// ```text
/// or      := and ( "||" and )*
/// and     := cmp ( "&&" cmp )*
/// cmp     := primary ( ("<" | ">" | "<=" | ">=" | "==" | "!=") primary )?
/// primary := number | "(" or ")"
/// ```
///
/// Comparisons and boolean operators yield `1.0` or `0.0`; the overall
/// result is truthy when nonzero.
struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(text: &str) -> Self {
        Self {
            tokens: tokenize(text),
            pos: 0,
        }
    }

    fn parse(mut self) -> Result<f64, &'static str> {
        let value = self.parse_or()?;
        if self.pos != self.tokens.len() {
            return Err("trailing tokens");
        }
        Ok(value)
    }

    fn parse_or(&mut self) -> Result<f64, &'static str> {
        let mut value = self.parse_and()?;
        while self.eat(Token::Or) {
            let rhs = self.parse_and()?;
            value = f64::from(value != 0.0 || rhs != 0.0);
        }
        Ok(value)
    }

    fn parse_and(&mut self) -> Result<f64, &'static str> {
        let mut value = self.parse_cmp()?;
        while self.eat(Token::And) {
            let rhs = self.parse_cmp()?;
            value = f64::from(value != 0.0 && rhs != 0.0);
        }
        Ok(value)
    }

    fn parse_cmp(&mut self) -> Result<f64, &'static str> {
        let lhs = self.parse_primary()?;
        let op = match self.peek() {
            Some(
                op @ (Token::Less
                | Token::Greater
                | Token::LessEq
                | Token::GreaterEq
                | Token::Eq
                | Token::NotEq),
            ) => op,
            _ => return Ok(lhs),
        };
        self.pos += 1;
        let rhs = self.parse_primary()?;
        let result = match op {
            Token::Less => lhs < rhs,
            Token::Greater => lhs > rhs,
            Token::LessEq => lhs <= rhs,
            Token::GreaterEq => lhs >= rhs,
            Token::Eq => (lhs - rhs).abs() < f64::EPSILON,
            Token::NotEq => (lhs - rhs).abs() >= f64::EPSILON,
            _ => return Err("bad comparison operator"),
        };
        Ok(f64::from(result))
    }

    fn parse_primary(&mut self) -> Result<f64, &'static str> {
        match self.peek() {
            Some(Token::Number(n)) => {
                self.pos += 1;
                Ok(n)
            }
            Some(Token::LParen) => {
                self.pos += 1;
                let value = self.parse_or()?;
                if !self.eat(Token::RParen) {
                    return Err("unclosed parenthesis");
                }
                Ok(value)
            }
            _ => Err("expected a number or parenthesis"),
        }
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn eat(&mut self, token: Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }
}

fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            c if c.is_ascii_whitespace() => i += 1,
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            '<' | '>' | '=' | '!' => {
                let eq_follows = chars.get(i + 1) == Some(&'=');
                let token = match (c, eq_follows) {
                    ('<', true) => Token::LessEq,
                    ('<', false) => Token::Less,
                    ('>', true) => Token::GreaterEq,
                    ('>', false) => Token::Greater,
                    ('=', true) => Token::Eq,
                    ('!', true) => Token::NotEq,
                    // A lone '=' or '!' poisons the stream; the parser
                    // rejects the stray paren.
                    _ => Token::RParen,
                };
                i += if eq_follows { 2 } else { 1 };
                tokens.push(token);
            }
            '&' | '|' => {
                let doubled = chars.get(i + 1) == Some(&c);
                tokens.push(if !doubled {
                    Token::RParen
                } else if c == '&' {
                    Token::And
                } else {
                    Token::Or
                });
                i += if doubled { 2 } else { 1 };
            }
            c if c.is_ascii_digit() || c == '-' || c == '.' => {
                let start = i;
                i += 1;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let literal: String = chars[start..i].iter().collect();
                match literal.parse::<f64>() {
                    Ok(n) => tokens.push(Token::Number(n)),
                    Err(_) => tokens.push(Token::RParen),
                }
            }
            _ => {
                // Unreachable after the whitelist, but stay total.
                tokens.push(Token::RParen);
                i += 1;
            }
        }
    }
    tokens
}

#[cfg(test)]
mod tests {
    use roverlab_types::{Direction, GridConfig, GridPos, ObjectKind, WorldObject};

    use super::*;

    fn world_with(objects: Vec<WorldObject>) -> WorldModel {
        WorldModel::new(
            GridConfig {
                width: 10,
                height: 10,
            },
            objects,
        )
    }

    fn robot() -> RobotState {
        RobotState::new(GridPos::new(5, 5), Direction::East, 100.0)
    }

    #[test]
    fn can_move_forward_respects_obstacles() {
        let open = world_with(vec![]);
        assert!(evaluate("canMoveForward", &open, &robot()));

        let walled = world_with(vec![WorldObject::new(
            ObjectKind::Obstacle,
            GridPos::new(6, 5),
        )]);
        assert!(!evaluate("canMoveForward", &walled, &robot()));
    }

    #[test]
    fn door_predicates_read_the_ahead_cell() {
        let mut door = WorldObject::new(ObjectKind::Obstacle, GridPos::new(6, 5));
        door.properties.is_door = true;
        let mut world = world_with(vec![door]);
        let robot = robot();

        assert!(evaluate("isDoorAhead", &world, &robot));
        assert!(!evaluate("isDoorOpen", &world, &robot));

        world.set_door_open(GridPos::new(6, 5), true);
        assert!(evaluate("isDoorOpen", &world, &robot));
    }

    #[test]
    fn inventory_predicates() {
        let world = world_with(vec![]);
        let mut robot = robot();
        assert!(!evaluate("hasItem", &world, &robot));
        assert!(!evaluate("inventoryFull", &world, &robot));

        for i in 0..INVENTORY_CAPACITY {
            robot.record_pickup(format!("item{i}"));
        }
        assert!(evaluate("hasItem", &world, &robot));
        assert!(evaluate("inventoryFull", &world, &robot));
    }

    #[test]
    fn energy_comparisons() {
        let world = world_with(vec![]);
        let mut robot = robot();
        assert!(evaluate("energy > 50", &world, &robot));
        assert!(!evaluate("energy < 50", &world, &robot));
        assert!(evaluate("energy >= 100", &world, &robot));
        assert!(evaluate("energy == 100", &world, &robot));

        robot.energy = 12.5;
        assert!(evaluate("energy < 20", &world, &robot));
        assert!(evaluate("energy != 12", &world, &robot));
    }

    #[test]
    fn inventory_size_substitutes() {
        let world = world_with(vec![]);
        let mut robot = robot();
        robot.record_pickup("a".to_owned());
        robot.record_pickup("b".to_owned());
        assert!(evaluate("inventorySize == 2", &world, &robot));
        assert!(evaluate("inventorySize < 3 && energy > 0", &world, &robot));
    }

    #[test]
    fn boolean_combinators_short_circuit_structurally() {
        let world = world_with(vec![]);
        let robot = robot();
        assert!(evaluate("energy > 200 || energy > 50", &world, &robot));
        assert!(!evaluate("energy > 200 && energy > 50", &world, &robot));
        assert!(evaluate("(energy > 200 || energy > 50) && 1 == 1", &world, &robot));
    }

    #[test]
    fn malformed_conditions_are_false_not_fatal() {
        let world = world_with(vec![]);
        let robot = robot();
        assert!(!evaluate("", &world, &robot));
        assert!(!evaluate("energy >", &world, &robot));
        assert!(!evaluate("(energy > 10", &world, &robot));
        assert!(!evaluate("energy > 10)", &world, &robot));
        assert!(!evaluate("unknownPredicate", &world, &robot));
    }

    #[test]
    fn hostile_text_is_rejected_by_the_whitelist() {
        let world = world_with(vec![]);
        let robot = robot();
        assert!(!evaluate("energy; while(true){}", &world, &robot));
        assert!(!evaluate("process.exit()", &world, &robot));
        assert!(!evaluate("energy > 10 // comment", &world, &robot));
    }
}
