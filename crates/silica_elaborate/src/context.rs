//! The elaboration context: chip resolution, caching, and recursion guard.

use crate::builtin::BuiltinRegistry;
use crate::class::{BuiltinSpec, ChipClass, ChipClassBody, PinInfo};
use crate::composite;
use crate::errors::ElabError;
use silica_common::MAX_WIDTH;
use silica_hdl::{parse_chip, ChipBody, PinDecl};
use silica_source::{SourceDb, Span};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Resolves chip names to `.hdl` files, elaborates them, and caches the
/// resulting blueprints by canonical path.
///
/// The context owns all source text loaded during a session. Elaboration
/// state is explicit: two contexts share nothing, and dropping a context
/// drops its cache. The builtin registry is borrowed, so one registry can
/// back any number of contexts.
pub struct ElabContext<'r> {
    source_db: SourceDb,
    registry: &'r BuiltinRegistry,
    search_dirs: Vec<PathBuf>,
    cache: HashMap<PathBuf, Arc<ChipClass>>,
    elab_stack: Vec<String>,
}

impl<'r> ElabContext<'r> {
    /// Creates a context searching the given directories, in order.
    pub fn new(registry: &'r BuiltinRegistry, search_dirs: Vec<PathBuf>) -> Self {
        Self {
            source_db: SourceDb::new(),
            registry,
            search_dirs,
            cache: HashMap::new(),
            elab_stack: Vec::new(),
        }
    }

    /// Appends a directory to the search path.
    pub fn add_search_dir(&mut self, dir: impl Into<PathBuf>) {
        self.search_dirs.push(dir.into());
    }

    /// Returns the source database for span resolution and rendering.
    pub fn source_db(&self) -> &SourceDb {
        &self.source_db
    }

    /// Returns the builtin registry this context validates against.
    pub fn registry(&self) -> &'r BuiltinRegistry {
        self.registry
    }

    /// Drops all cached blueprints. Chips elaborated afterwards are re-read
    /// from disk, picking up any edits to their `.hdl` files.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Returns the blueprint for `name`, elaborating its `.hdl` file (and,
    /// recursively, its parts) on first use.
    ///
    /// `span` is the reference that triggered the lookup, used when the
    /// chip cannot be found; pass [`Span::DUMMY`] for top-level requests.
    pub fn lookup_or_elaborate(
        &mut self,
        name: &str,
        span: Span,
    ) -> Result<Arc<ChipClass>, ElabError> {
        let path = self.resolve(name, span)?;
        if let Some(class) = self.cache.get(&path) {
            return Ok(Arc::clone(class));
        }

        if self.elab_stack.iter().any(|n| n == name) {
            let mut chain: Vec<&str> = self.elab_stack.iter().map(String::as_str).collect();
            chain.push(name);
            return Err(ElabError::CircularInclusion {
                chain: chain.join(" -> "),
                span,
            });
        }

        self.elab_stack.push(name.to_string());
        let result = self.elaborate_file(&path, name);
        self.elab_stack.pop();

        let class = Arc::new(result?);
        self.cache.insert(path, Arc::clone(&class));
        Ok(class)
    }

    /// Finds `<name>.hdl` in the search directories, first match wins.
    fn resolve(&self, name: &str, span: Span) -> Result<PathBuf, ElabError> {
        for dir in &self.search_dirs {
            let candidate = dir.join(format!("{name}.hdl"));
            if candidate.is_file() {
                return candidate.canonicalize().map_err(|source| ElabError::Io {
                    path: candidate,
                    source,
                });
            }
        }
        Err(ElabError::ChipNotFound {
            name: name.to_string(),
            span,
        })
    }

    fn elaborate_file(&mut self, path: &Path, name: &str) -> Result<ChipClass, ElabError> {
        let file_id = self.source_db.load_file(path).map_err(|source| ElabError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let content = self.source_db.get_file(file_id).content.clone();
        let decl = parse_chip(&content, file_id)?;

        if decl.name != name {
            return Err(ElabError::NameMismatch {
                declared: decl.name.clone(),
                file_stem: name.to_string(),
                span: decl.name_span,
            });
        }

        let inputs = pin_infos(&decl.inputs, &decl.outputs)?;
        let outputs = pin_infos_unchecked(&decl.outputs);

        match &decl.body {
            ChipBody::Builtin {
                impl_name,
                impl_span,
                clocked,
            } => {
                if !self.registry.contains(impl_name) {
                    return Err(ElabError::UnknownBuiltin {
                        impl_name: impl_name.clone(),
                        span: *impl_span,
                    });
                }
                let mut input_clocked = vec![false; inputs.len()];
                let mut output_clocked = vec![false; outputs.len()];
                for (pin, pin_span) in clocked {
                    if let Some(i) = inputs.iter().position(|p| &p.name == pin) {
                        input_clocked[i] = true;
                    } else if let Some(i) = outputs.iter().position(|p| &p.name == pin) {
                        output_clocked[i] = true;
                    } else {
                        return Err(ElabError::ClockedPinUnknown {
                            pin: pin.clone(),
                            span: *pin_span,
                        });
                    }
                }
                Ok(ChipClass::assemble(
                    decl.name.clone(),
                    inputs,
                    outputs,
                    input_clocked,
                    output_clocked,
                    ChipClassBody::Builtin(BuiltinSpec {
                        impl_name: impl_name.clone(),
                    }),
                ))
            }
            ChipBody::Parts { parts } => {
                composite::elaborate(self, &decl, inputs, outputs, parts)
            }
        }
    }
}

/// Converts the input declarations, checking widths and checking name
/// uniqueness across the whole boundary (inputs and outputs together).
fn pin_infos(inputs: &[PinDecl], outputs: &[PinDecl]) -> Result<Vec<PinInfo>, ElabError> {
    let mut seen: HashSet<&str> = HashSet::new();
    for decl in inputs.iter().chain(outputs) {
        if decl.width == 0 || decl.width > MAX_WIDTH {
            return Err(ElabError::InvalidWidth {
                name: decl.name.clone(),
                width: decl.width,
                span: decl.span,
            });
        }
        if !seen.insert(&decl.name) {
            return Err(ElabError::DuplicatePin {
                name: decl.name.clone(),
                span: decl.span,
            });
        }
    }
    Ok(pin_infos_unchecked(inputs))
}

fn pin_infos_unchecked(decls: &[PinDecl]) -> Vec<PinInfo> {
    decls
        .iter()
        .map(|d| PinInfo::new(d.name.clone(), d.width))
        .collect()
}
