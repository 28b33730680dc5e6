// crates/template_engine/src/parser.rs

use crate::functions;
use crate::lexer::{Item, Token};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Node {
    Text(String),
    Action(Pipeline),
    If {
        cond: Pipeline,
        then: Vec<Node>,
        otherwise: Vec<Node>,
    },
    Range {
        pipe: Pipeline,
        body: Vec<Node>,
        otherwise: Vec<Node>,
    },
}

/// `cmd | cmd | ...`; each stage after the first receives the previous result
/// as its final argument.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Pipeline {
    pub line: usize,
    pub commands: Vec<Command>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Command {
    pub terms: Vec<Term>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Term {
    Str(String),
    Int(i64),
    Bool(bool),
    Field(Vec<String>),
    Root(Vec<String>),
    Func(String),
    Sub(Pipeline),
}

pub(crate) type ParseError = (usize, String);

enum End {
    Eof,
    Else(usize, Vec<Token>),
    End(usize),
}

pub(crate) fn parse(items: Vec<Item>) -> Result<Vec<Node>, ParseError> {
    let mut parser = Parser { items, pos: 0 };
    let (nodes, end) = parser.parse_list()?;
    match end {
        End::Eof => Ok(nodes),
        End::Else(line, _) => Err((line, "unexpected {{else}}".to_string())),
        End::End(line) => Err((line, "unexpected {{end}}".to_string())),
    }
}

struct Parser {
    items: Vec<Item>,
    pos: usize,
}

impl Parser {
    fn next(&mut self) -> Option<Item> {
        let item = self.items.get(self.pos).cloned();
        self.pos += 1;
        item
    }

    fn parse_list(&mut self) -> Result<(Vec<Node>, End), ParseError> {
        let mut nodes = Vec::new();
        while let Some(item) = self.next() {
            let (line, tokens) = match item {
                Item::Text(text) => {
                    nodes.push(Node::Text(text));
                    continue;
                }
                Item::Action { line, tokens } => (line, tokens),
            };

            match tokens.first() {
                Some(Token::Ident(kw)) if kw == "if" => {
                    let cond = parse_pipeline(line, &tokens[1..])?;
                    let (then, end) = self.parse_list()?;
                    let otherwise = self.parse_tail("if", line, end)?;
                    nodes.push(Node::If { cond, then, otherwise });
                }
                Some(Token::Ident(kw)) if kw == "range" => {
                    let pipe = parse_pipeline(line, &tokens[1..])?;
                    let (body, end) = self.parse_list()?;
                    let otherwise = self.parse_tail("range", line, end)?;
                    nodes.push(Node::Range { pipe, body, otherwise });
                }
                Some(Token::Ident(kw)) if kw == "else" => {
                    return Ok((nodes, End::Else(line, tokens[1..].to_vec())));
                }
                Some(Token::Ident(kw)) if kw == "end" => {
                    if tokens.len() > 1 {
                        return Err((line, "unexpected arguments after {{end}}".to_string()));
                    }
                    return Ok((nodes, End::End(line)));
                }
                _ => nodes.push(Node::Action(parse_pipeline(line, &tokens)?)),
            }
        }
        Ok((nodes, End::Eof))
    }

    /// Consumes whatever follows the body of an `if`/`range` and returns the
    /// else-branch. `{{else if ...}}` chains are folded into nested `If` nodes.
    fn parse_tail(&mut self, keyword: &str, open_line: usize, end: End) -> Result<Vec<Node>, ParseError> {
        match end {
            End::Eof => Err((
                open_line,
                format!("unexpected EOF: missing {{{{end}}}} for {{{{{}}}}}", keyword),
            )),
            End::End(_) => Ok(Vec::new()),
            End::Else(line, rest) if rest.is_empty() => {
                let (otherwise, end) = self.parse_list()?;
                match end {
                    End::End(_) => Ok(otherwise),
                    End::Eof => Err((
                        line,
                        format!("unexpected EOF: missing {{{{end}}}} for {{{{{}}}}}", keyword),
                    )),
                    End::Else(line, _) => Err((line, "unexpected second {{else}}".to_string())),
                }
            }
            End::Else(line, rest) => {
                if keyword != "if" || rest.first() != Some(&Token::Ident("if".to_string())) {
                    return Err((line, "unexpected arguments after {{else}}".to_string()));
                }
                let cond = parse_pipeline(line, &rest[1..])?;
                let (then, end) = self.parse_list()?;
                let otherwise = self.parse_tail("if", line, end)?;
                Ok(vec![Node::If { cond, then, otherwise }])
            }
        }
    }
}

fn parse_pipeline(line: usize, tokens: &[Token]) -> Result<Pipeline, ParseError> {
    if tokens.is_empty() {
        return Err((line, "missing value for command".to_string()));
    }

    let mut commands = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::LParen => depth += 1,
            Token::RParen => {
                depth = depth
                    .checked_sub(1)
                    .ok_or((line, "unexpected right paren".to_string()))?;
            }
            Token::Pipe if depth == 0 => {
                commands.push(parse_command(line, &tokens[start..i])?);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err((line, "unclosed left paren".to_string()));
    }
    commands.push(parse_command(line, &tokens[start..])?);

    for (stage, cmd) in commands.iter().enumerate().skip(1) {
        if !matches!(cmd.terms.first(), Some(Term::Func(_))) {
            return Err((
                line,
                format!("non executable command in pipeline stage {}", stage + 1),
            ));
        }
    }

    Ok(Pipeline { line, commands })
}

fn parse_command(line: usize, tokens: &[Token]) -> Result<Command, ParseError> {
    if tokens.is_empty() {
        return Err((line, "missing command in pipeline".to_string()));
    }

    let mut terms = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        let term = match &tokens[i] {
            Token::Str(s) => Term::Str(s.clone()),
            Token::Int(n) => Term::Int(*n),
            Token::Field(path) => Term::Field(path.clone()),
            Token::Root(path) => Term::Root(path.clone()),
            Token::Ident(name) if name == "true" => Term::Bool(true),
            Token::Ident(name) if name == "false" => Term::Bool(false),
            Token::Ident(name) => {
                if !functions::is_defined(name) {
                    return Err((line, format!("function {:?} not defined", name)));
                }
                Term::Func(name.clone())
            }
            Token::LParen => {
                let close = matching_paren(tokens, i)
                    .ok_or((line, "unclosed left paren".to_string()))?;
                let sub = parse_pipeline(line, &tokens[i + 1..close])?;
                i = close;
                Term::Sub(sub)
            }
            Token::RParen => return Err((line, "unexpected right paren".to_string())),
            Token::Pipe => return Err((line, "missing command in pipeline".to_string())),
        };
        terms.push(term);
        i += 1;
    }

    Ok(Command { terms })
}

fn matching_paren(tokens: &[Token], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(open) {
        match token {
            Token::LParen => depth += 1,
            Token::RParen => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
