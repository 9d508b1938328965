//! Untyped CIF document model with category-level access.
//!
//! The reader layers above never walk individual tags; they ask a block
//! for a whole category (`atom_site`, `entity`, ...) and get back named
//! columns of nullable strings, whether the file wrote the category as a
//! loop or as single-row key-value pairs.

use crate::io::cif::parse::{CifError, Spanned, Token, Tokenizer, Value};

/// A parsed CIF file: one or more data blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    blocks: Vec<Block>,
}

/// One `data_` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    name: String,
    items: Vec<(String, Value)>,
    loops: Vec<LoopTable>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct LoopTable {
    tags: Vec<String>,
    columns: Vec<Vec<Value>>,
}

/// One category of a block, flattened to columns of nullable strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    name: String,
    columns: Vec<(String, Vec<Option<String>>)>,
}

impl Document {
    /// Parses CIF text into blocks. Fails on malformed syntax, and on
    /// input that contains no data block at all.
    pub fn parse(text: &str) -> Result<Document, CifError> {
        let mut tokenizer = Tokenizer::new(text);
        let mut blocks: Vec<Block> = Vec::new();
        let mut in_save_frame = false;
        let mut pending: Option<Spanned> = None;

        loop {
            let spanned = match pending.take() {
                Some(t) => t,
                None => match tokenizer.next_token()? {
                    Some(t) => t,
                    None => break,
                },
            };

            // Save frames carry dictionary definitions, not data; skip
            // their contents entirely.
            match &spanned.token {
                Token::SaveFrame(_) => {
                    in_save_frame = true;
                    continue;
                }
                Token::SaveEnd => {
                    in_save_frame = false;
                    continue;
                }
                _ if in_save_frame => continue,
                _ => {}
            }

            match spanned.token {
                Token::DataBlock(name) => blocks.push(Block {
                    name,
                    items: Vec::new(),
                    loops: Vec::new(),
                }),
                Token::Tag(tag) => {
                    let block = blocks
                        .last_mut()
                        .ok_or(CifError::ValueOutsideBlock { line: spanned.line })?;
                    match tokenizer.next_token()? {
                        Some(Spanned {
                            token: Token::Value(value),
                            ..
                        }) => block.items.push((tag, value)),
                        _ => {
                            return Err(CifError::MissingValue {
                                tag,
                                line: spanned.line,
                            })
                        }
                    }
                }
                Token::Loop => {
                    let loop_line = spanned.line;
                    if blocks.is_empty() {
                        return Err(CifError::ValueOutsideBlock { line: loop_line });
                    }
                    let (table, next) = parse_loop(&mut tokenizer, loop_line)?;
                    pending = next;
                    if let Some(block) = blocks.last_mut() {
                        block.loops.push(table);
                    }
                }
                Token::Value(_) => {
                    return Err(CifError::ValueOutsideBlock { line: spanned.line })
                }
                Token::SaveFrame(_) | Token::SaveEnd => unreachable!(),
            }
        }

        if blocks.is_empty() {
            return Err(CifError::NoDataBlock);
        }
        Ok(Document { blocks })
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// The first data block. Structure files carry exactly one.
    pub fn first_block(&self) -> &Block {
        &self.blocks[0]
    }

    /// Case-insensitive block lookup.
    pub fn block(&self, name: &str) -> Option<&Block> {
        self.blocks
            .iter()
            .find(|block| block.name.eq_ignore_ascii_case(name))
    }
}

/// Reads tags then values after a `loop_` keyword. Returns the finished
/// table plus the first token that belongs to whatever follows the loop.
fn parse_loop(
    tokenizer: &mut Tokenizer<'_>,
    loop_line: usize,
) -> Result<(LoopTable, Option<Spanned>), CifError> {
    let mut tags: Vec<String> = Vec::new();
    let mut values: Vec<Value> = Vec::new();
    let mut trailing: Option<Spanned> = None;

    // Header: one or more tags.
    loop {
        match tokenizer.next_token()? {
            Some(Spanned {
                token: Token::Tag(tag),
                ..
            }) => tags.push(tag),
            other => {
                if tags.is_empty() {
                    return Err(CifError::EmptyLoop { line: loop_line });
                }
                // Body: values until a non-value token or end of input.
                let mut next = other;
                loop {
                    match next {
                        Some(Spanned {
                            token: Token::Value(value),
                            ..
                        }) => {
                            values.push(value);
                            next = tokenizer.next_token()?;
                        }
                        other => {
                            trailing = other;
                            break;
                        }
                    }
                }
                break;
            }
        }
    }

    if values.len() % tags.len() != 0 {
        return Err(CifError::RaggedLoop {
            line: loop_line,
            tags: tags.len(),
            values: values.len(),
        });
    }

    let rows = values.len() / tags.len();
    let mut columns = vec![Vec::with_capacity(rows); tags.len()];
    for (index, value) in values.into_iter().enumerate() {
        columns[index % tags.len()].push(value);
    }

    Ok((LoopTable { tags, columns }, trailing))
}

impl Block {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Looks up a single key-value item by its full tag, e.g. `entry.id`.
    pub fn item(&self, tag: &str) -> Option<&Value> {
        let tag = tag.to_ascii_lowercase();
        self.items
            .iter()
            .find(|(name, _)| *name == tag)
            .map(|(_, value)| value)
    }

    /// Collects every tag of the named category into one column set.
    ///
    /// Returns `Ok(None)` when the block simply has no such category. A
    /// category written more than once (two loops, or pairs plus a loop)
    /// is malformed input.
    pub fn category(&self, name: &str) -> Result<Option<Category>, CifError> {
        let prefix = format!("{}.", name.to_ascii_lowercase());

        let pair_columns: Vec<(String, Vec<Option<String>>)> = self
            .items
            .iter()
            .filter_map(|(tag, value)| {
                tag.strip_prefix(&prefix).map(|item| {
                    (item.to_string(), vec![value.clone().into_option()])
                })
            })
            .collect();

        let mut loop_columns: Option<Vec<(String, Vec<Option<String>>)>> = None;
        for table in &self.loops {
            let matching: Vec<(String, Vec<Option<String>>)> = table
                .tags
                .iter()
                .zip(&table.columns)
                .filter_map(|(tag, column)| {
                    tag.strip_prefix(&prefix).map(|item| {
                        let values = column
                            .iter()
                            .map(|value| value.clone().into_option())
                            .collect();
                        (item.to_string(), values)
                    })
                })
                .collect();
            if matching.is_empty() {
                continue;
            }
            if loop_columns.is_some() {
                return Err(CifError::DuplicateCategory {
                    category: name.to_string(),
                });
            }
            loop_columns = Some(matching);
        }

        match (pair_columns.is_empty(), loop_columns) {
            (true, None) => Ok(None),
            (false, None) => Ok(Some(Category {
                name: name.to_string(),
                columns: pair_columns,
            })),
            (true, Some(columns)) => Ok(Some(Category {
                name: name.to_string(),
                columns,
            })),
            (false, Some(_)) => Err(CifError::DuplicateCategory {
                category: name.to_string(),
            }),
        }
    }
}

impl Category {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of rows; one for a pair-style category.
    pub fn height(&self) -> usize {
        self.columns.first().map_or(0, |(_, values)| values.len())
    }

    /// Column lookup by item name (the part after the dot).
    pub fn column(&self, item: &str) -> Option<&[Option<String>]> {
        let item = item.to_ascii_lowercase();
        self.columns
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(&item))
            .map(|(_, values)| values.as_slice())
    }

    pub fn has_column(&self, item: &str) -> bool {
        self.column(item).is_some()
    }
}
