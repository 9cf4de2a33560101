//! The [`Formatter`] and its printer registry.

use std::fmt::{self, Write as _};

use indexmap::IndexMap;
use keel_arena::{Allocator, ScratchArena, ScratchPool};
use keel_array::DynArray;
use keel_core::{Block, FormatError};
use tracing::trace;

use crate::arg::Arg;

/// Renders one argument into `out`; returns `false` when the argument is
/// not of the type the printer handles.
pub type Printer = Box<dyn Fn(&Arg<'_>, &mut String) -> bool>;

/// Template engine with a registry of placeholder printers.
///
/// Placeholders are registered with their braces (`"{u32}"`). Registration
/// order is preserved, so [`placeholders`](Self::placeholders) lists the
/// built-ins first and user printers after them.
pub struct Formatter {
    printers: IndexMap<String, Printer>,
}

/// Register a built-in printer that `Display`s one `Arg` variant.
macro_rules! display_printers {
    ($f:ident: $($name:literal => $variant:ident),* $(,)?) => {
        $(
            $f.register($name, |a, out| match a {
                Arg::$variant(v) => write!(out, "{v}").is_ok(),
                _ => false,
            });
        )*
    };
}

impl Formatter {
    /// A formatter with the built-in printers `{i8}`, `{u8}`, `{i16}`,
    /// `{u16}`, `{i32}`, `{u32}`, `{i64}`, `{u64}`, `{f32}`, `{f64}`,
    /// `{bool}` and `{str}`.
    pub fn new() -> Self {
        let mut f = Self::empty();
        display_printers!(f:
            "{i8}" => I8,
            "{u8}" => U8,
            "{i16}" => I16,
            "{u16}" => U16,
            "{i32}" => I32,
            "{u32}" => U32,
            "{i64}" => I64,
            "{u64}" => U64,
            "{f32}" => F32,
            "{f64}" => F64,
            "{bool}" => Bool,
        );
        f.register("{str}", |a, out| match a {
            Arg::Str(v) => {
                out.push_str(v);
                true
            }
            _ => false,
        });
        f
    }

    /// A formatter with no printers at all.
    pub fn empty() -> Self {
        Self {
            printers: IndexMap::new(),
        }
    }

    /// Register `printer` for `placeholder`, returning the printer it
    /// replaces.
    pub fn register<F>(&mut self, placeholder: impl Into<String>, printer: F) -> Option<Printer>
    where
        F: Fn(&Arg<'_>, &mut String) -> bool + 'static,
    {
        self.printers.insert(placeholder.into(), Box::new(printer))
    }

    /// Whether a printer is registered for `placeholder`.
    pub fn has_printer(&self, placeholder: &str) -> bool {
        self.printers.contains_key(placeholder)
    }

    /// Registered placeholders in registration order.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.printers.keys().map(String::as_str)
    }

    /// Expand `template` against `args`.
    ///
    /// Borrows one scratch arena from `pool` for the duration of the call
    /// and always returns it, on success or failure.
    pub fn format(
        &self,
        pool: &mut ScratchPool<'_>,
        template: &str,
        args: &[Arg<'_>],
    ) -> Result<String, FormatError> {
        let handle = pool.get_scratch().ok_or(FormatError::ScratchExhausted)?;
        let result = {
            let scratch = pool.arena_mut(&handle);
            self.render(scratch, template, args).map(|pieces| {
                let scratch = &*scratch;
                let mut out = Vec::with_capacity(total_len(scratch, &pieces));
                for block in pieces.iter(scratch) {
                    out.extend_from_slice(scratch.bytes(block));
                }
                // Every piece is a whole `str`, so the concatenation is valid UTF-8.
                String::from_utf8(out)
                    .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
            })
        };
        pool.release_scratch(handle);
        result
    }

    /// Expand `template` into a block allocated from `arena`.
    ///
    /// The pieces are copied straight from the scratch arena into the
    /// block, and the text occupies its first bytes. For byte-addressed
    /// arenas the block is exactly as long as the text; pool arenas round
    /// up to whole units and leave the tail zeroed (if the arena zeroes).
    pub fn format_into<A: Allocator + ?Sized>(
        &self,
        pool: &mut ScratchPool<'_>,
        arena: &mut A,
        template: &str,
        args: &[Arg<'_>],
    ) -> Result<Block, FormatError> {
        let handle = pool.get_scratch().ok_or(FormatError::ScratchExhausted)?;
        let result = {
            let scratch = pool.arena_mut(&handle);
            self.render(scratch, template, args).and_then(|pieces| {
                let scratch = &*scratch;
                let block = arena.allocate_bytes(total_len(scratch, &pieces))?;
                let dst = arena.bytes_mut(block);
                let mut at = 0;
                for piece in pieces.iter(scratch) {
                    let src = scratch.bytes(piece);
                    dst[at..at + src.len()].copy_from_slice(src);
                    at += src.len();
                }
                Ok(block)
            })
        };
        pool.release_scratch(handle);
        result
    }

    /// Render `template` piece by piece into `scratch`.
    ///
    /// Literal runs are copied from the template itself; only printer
    /// output passes through a reused staging `String`. The returned
    /// array lives in `scratch` and lists the pieces in output order.
    fn render(
        &self,
        scratch: &mut ScratchArena<'_>,
        template: &str,
        args: &[Arg<'_>],
    ) -> Result<DynArray<Block>, FormatError> {
        let mut pieces: DynArray<Block> = DynArray::new();
        let mut printed = String::new();
        let mut args = args.iter();
        let mut run = 0;
        let mut pos = 0;

        while let Some(offset) = template[pos..].find(['\\', '{']) {
            let at = pos + offset;
            let rest = &template[at..];
            if rest.starts_with("\\{") {
                // Keep the brace as the first byte of the next run.
                push_piece(scratch, &mut pieces, &template[run..at])?;
                run = at + 1;
                pos = at + 2;
                continue;
            }
            if rest.starts_with('\\') {
                pos = at + 1;
                continue;
            }
            let close = rest
                .find('}')
                .ok_or(FormatError::UnterminatedPlaceholder { position: at })?;
            let name = &rest[..=close];
            let printer = self
                .printers
                .get(name)
                .ok_or_else(|| FormatError::UnknownPlaceholder {
                    name: name.to_owned(),
                })?;
            let arg = args.next().ok_or_else(|| FormatError::MissingArgument {
                placeholder: name.to_owned(),
            })?;

            push_piece(scratch, &mut pieces, &template[run..at])?;
            printed.clear();
            if !printer(arg, &mut printed) {
                return Err(FormatError::ArgumentMismatch {
                    placeholder: name.to_owned(),
                });
            }
            push_piece(scratch, &mut pieces, &printed)?;
            pos = at + close + 1;
            run = pos;
        }
        push_piece(scratch, &mut pieces, &template[run..])?;

        trace!(
            pieces = pieces.len(),
            bytes = total_len(scratch, &pieces),
            "rendered template"
        );
        Ok(pieces)
    }
}

/// Copy `text` into a fresh scratch block and record it.
fn push_piece(
    scratch: &mut ScratchArena<'_>,
    pieces: &mut DynArray<Block>,
    text: &str,
) -> Result<(), FormatError> {
    if text.is_empty() {
        return Ok(());
    }
    let block = scratch.allocate(text.len())?;
    scratch.bytes_mut(block).copy_from_slice(text.as_bytes());
    pieces.append(scratch, block)?;
    Ok(())
}

fn total_len(scratch: &ScratchArena<'_>, pieces: &DynArray<Block>) -> usize {
    pieces.iter(scratch).map(|b| b.len() as usize).sum()
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Formatter")
            .field("placeholders", &self.printers.keys().collect::<Vec<_>>())
            .finish()
    }
}
