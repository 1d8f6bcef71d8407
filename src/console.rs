use std::{collections::BTreeMap, fs, io::Write, path::Path};

use crate::{
    ease::EaseFn,
    effect::Effect,
    error::{KaleidoError, KaleidoResult},
    fade::Fade,
    scene::Scene,
    selection::{Focus, Selection},
    stage::Stage,
};

/// The fixed catalogue of console operations. Textual spellings live in the
/// syntax file; the interpreter only ever sees these identifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Op {
    ListGroupProtos,
    ListEffectProtos,
    ListEaseProtos,
    ListChildren,
    ListEffects,
    AddGroup,
    AddRandomGroup,
    AddEffect,
    AddRandomEffect,
    RemoveGroup,
    RemoveEffect,
    Remove,
    SelectGroup,
    SelectEffect,
    LevelUp,
    GoRoot,
    FadeIn,
    FadeOut,
    Enable,
    Disable,
    Info,
    Help,
    Exit,
}

/// What the driver should do after a line has been interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Signal {
    Continue,
    Quit,
}

/// A syntax file maps syntax names to keyword tables:
/// `{ "<syntax>": { "<keyword>": "<Op>" } }`.
type SyntaxFile = BTreeMap<String, BTreeMap<String, Op>>;

enum Source<'a> {
    Named(&'a str),
    Random,
}

/// The command interpreter: owns the keyword table and the operator's
/// [`Selection`], and mutates a [`Scene`] one line at a time. Listings and
/// descriptions go to the writer handed to [`Console::interpret`]; every
/// failure is returned for the caller to report, with the selection and tree
/// untouched by the failed command.
pub struct Console {
    ops: BTreeMap<String, Op>,
    selection: Selection,
}

impl Console {
    /// Loads the named syntax from a JSON syntax file. A missing or
    /// unparsable file, or an absent syntax name, is fatal: no `Console`
    /// value exists and the caller is expected to abort startup.
    pub fn from_syntax_file(path: &Path, syntax: &str) -> KaleidoResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            KaleidoError::setup(format!("cannot read syntax file '{}': {e}", path.display()))
        })?;
        let table: SyntaxFile = serde_json::from_str(&text).map_err(|e| {
            KaleidoError::setup(format!("malformed syntax file '{}': {e}", path.display()))
        })?;
        let ops = table.get(syntax).ok_or_else(|| {
            KaleidoError::setup(format!(
                "no syntax called '{syntax}' in '{}'",
                path.display()
            ))
        })?;
        Ok(Self::from_syntax(ops.clone()))
    }

    pub fn from_syntax(ops: BTreeMap<String, Op>) -> Self {
        Self {
            ops,
            selection: Selection::new(),
        }
    }

    /// The keyword table the binary uses when no syntax file is given; also
    /// the vocabulary `demos/syntax.json` spells out.
    pub fn default_syntax() -> BTreeMap<String, Op> {
        [
            ("groups", Op::ListGroupProtos),
            ("effects", Op::ListEffectProtos),
            ("eases", Op::ListEaseProtos),
            ("ls", Op::ListChildren),
            ("fx", Op::ListEffects),
            ("add", Op::AddGroup),
            ("add-rnd", Op::AddRandomGroup),
            ("attach", Op::AddEffect),
            ("attach-rnd", Op::AddRandomEffect),
            ("rm-child", Op::RemoveGroup),
            ("rm-fx", Op::RemoveEffect),
            ("rm", Op::Remove),
            ("cd", Op::SelectGroup),
            ("sel", Op::SelectEffect),
            ("up", Op::LevelUp),
            ("root", Op::GoRoot),
            ("in", Op::FadeIn),
            ("out", Op::FadeOut),
            ("on", Op::Enable),
            ("off", Op::Disable),
            ("info", Op::Info),
            ("help", Op::Help),
            ("exit", Op::Exit),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v))
        .collect()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The prompt prefix for the current selection.
    pub fn context_string(&self, scene: &Scene) -> String {
        self.selection.context_string(&scene.root)
    }

    /// Interprets one line. Tokenization is on whitespace; the first token
    /// picks the operation, the rest are its arguments. Blank lines are
    /// ignored. Errors leave the scene and selection exactly as they were.
    #[tracing::instrument(skip(self, scene, stage, out))]
    pub fn interpret(
        &mut self,
        scene: &mut Scene,
        stage: &mut dyn Stage,
        line: &str,
        out: &mut dyn Write,
    ) -> KaleidoResult<Signal> {
        let args: Vec<&str> = line.split_whitespace().collect();
        let Some(&keyword) = args.first() else {
            return Ok(Signal::Continue);
        };
        let Some(&op) = self.ops.get(keyword) else {
            return Err(KaleidoError::lookup(format!(
                "command '{keyword}' not known"
            )));
        };

        match op {
            Op::ListGroupProtos => {
                write_listing(out, "group prototypes:", &scene.groups.names())?;
            }
            Op::ListEffectProtos => {
                write_listing(out, "effect prototypes:", &scene.effects.names())?;
            }
            Op::ListEaseProtos => {
                write_listing(out, "easing prototypes:", &scene.eases.names())?;
            }
            Op::ListChildren => {
                let current = self.require_group(scene)?;
                let names: Vec<_> = current.children().iter().map(|g| g.name().to_owned()).collect();
                write_listing(out, "child groups:", &names)?;
            }
            Op::ListEffects => {
                let current = self.require_group(scene)?;
                let names: Vec<_> = current.effects().iter().map(|e| e.name().to_owned()).collect();
                write_listing(out, "attached effects:", &names)?;
            }
            Op::AddGroup => {
                let name = require_arg(&args, 1, "<group>")?;
                self.add_group(scene, stage, Source::Named(name))?;
            }
            Op::AddRandomGroup => {
                self.add_group(scene, stage, Source::Random)?;
            }
            Op::AddEffect => {
                let name = require_arg(&args, 1, "<effect>")?;
                self.add_effect(scene, Source::Named(name))?;
            }
            Op::AddRandomEffect => {
                self.add_effect(scene, Source::Random)?;
            }
            Op::RemoveGroup => {
                let index = require_index(&args, 1)?;
                self.require_group(scene)?;
                let current = self.selection.group_mut(&mut scene.root);
                let removed = current.remove_child_at(index).ok_or_else(|| {
                    KaleidoError::lookup(format!("child index {index} is out of range"))
                })?;
                removed.dispose(stage);
            }
            Op::RemoveEffect => {
                let index = require_index(&args, 1)?;
                self.require_group(scene)?;
                let current = self.selection.group_mut(&mut scene.root);
                current.remove_effect_at(index).ok_or_else(|| {
                    KaleidoError::lookup(format!("effect index {index} is out of range"))
                })?;
            }
            Op::Remove => match self.selection.focus() {
                Focus::Root => {
                    tracing::debug!("remove at the root is a no-op");
                }
                Focus::Group => {
                    if let Some(index) = self.selection.pop_current() {
                        let parent = self.selection.group_mut(&mut scene.root);
                        if let Some(removed) = parent.remove_child_at(index) {
                            removed.dispose(stage);
                        }
                    }
                }
                Focus::Effect => {
                    if let Some(index) = self.selection.selected_effect() {
                        self.selection.group_mut(&mut scene.root).remove_effect_at(index);
                    }
                    self.selection.clear_effect();
                }
            },
            Op::SelectGroup => {
                let index = require_index(&args, 1)?;
                self.selection.select_child(&scene.root, index)?;
            }
            Op::SelectEffect => {
                let index = require_index(&args, 1)?;
                self.selection.select_effect(&scene.root, index)?;
            }
            Op::LevelUp => self.selection.level_up(),
            Op::GoRoot => self.selection.go_root(),
            Op::FadeIn => {
                let (duration, ease) = self.fade_args(scene, &args, keyword)?;
                self.focused_fade_mut(scene)?.fade_in(duration, ease);
            }
            Op::FadeOut => {
                let (duration, ease) = self.fade_args(scene, &args, keyword)?;
                self.focused_fade_mut(scene)?.fade_out(duration, ease);
            }
            Op::Enable => self.focused_fade_mut(scene)?.set_enabled(true),
            Op::Disable => self.focused_fade_mut(scene)?.set_enabled(false),
            Op::Info => self.write_info(scene, out)?,
            Op::Help => {
                let keywords: Vec<_> = self.ops.keys().cloned().collect();
                write_listing(out, "commands:", &keywords)?;
            }
            Op::Exit => return Ok(Signal::Quit),
        }

        Ok(Signal::Continue)
    }

    fn require_group<'a>(&self, scene: &'a Scene) -> KaleidoResult<&'a crate::group::Group> {
        if !self.selection.on_group() {
            return Err(KaleidoError::context(
                "only groups can carry child groups and effects",
            ));
        }
        Ok(self.selection.group(&scene.root))
    }

    /// Clones a group prototype, attaches it under the current group,
    /// descends into it, and sets it up. One atomic step: the lookup is the
    /// only failure point before attachment.
    fn add_group(
        &mut self,
        scene: &mut Scene,
        stage: &mut dyn Stage,
        source: Source<'_>,
    ) -> KaleidoResult<()> {
        self.require_group(scene)?;

        let group = match source {
            Source::Named(name) => scene.groups.create(name).ok_or_else(|| {
                KaleidoError::lookup(format!("group prototype '{name}' is not known"))
            })?,
            Source::Random => scene
                .groups
                .create_random(&mut scene.rng)
                .ok_or_else(|| KaleidoError::lookup("no group prototypes registered"))?,
        };

        let parent = self.selection.group_mut(&mut scene.root);
        let index = parent.children().len();
        parent.add_child(group);
        self.selection.select_child(&scene.root, index)?;
        self.selection.group_mut(&mut scene.root).setup(stage)?;
        Ok(())
    }

    fn add_effect(&mut self, scene: &mut Scene, source: Source<'_>) -> KaleidoResult<()> {
        self.require_group(scene)?;

        let effect = match source {
            Source::Named(name) => scene.effects.create(name).ok_or_else(|| {
                KaleidoError::lookup(format!("effect prototype '{name}' is not known"))
            })?,
            Source::Random => scene
                .effects
                .create_random(&mut scene.rng)
                .ok_or_else(|| KaleidoError::lookup("no effect prototypes registered"))?,
        };

        self.selection.group_mut(&mut scene.root).add_effect(effect);
        Ok(())
    }

    /// Parses `<millis> [<ease>]` and resolves the easing function: the
    /// named prototype, or a random one when the name is omitted. The ease's
    /// x-stretch is divided by the duration so its unit domain spans the
    /// whole fade.
    fn fade_args(
        &mut self,
        scene: &mut Scene,
        args: &[&str],
        keyword: &str,
    ) -> KaleidoResult<(f64, EaseFn)> {
        let millis = require_arg(args, 1, "<milliseconds> [<ease>]")?;
        let millis: i64 = millis.parse().map_err(|_| {
            KaleidoError::argument(format!(
                "first parameter '{millis}' of '{keyword}' must be a number"
            ))
        })?;
        let duration = millis as f64 / 1000.0;

        let mut ease = match args.get(2) {
            Some(&name) => scene.eases.create(name).ok_or_else(|| {
                KaleidoError::lookup(format!("easing function '{name}' is not known"))
            })?,
            None => scene
                .eases
                .create_random(&mut scene.rng)
                .ok_or_else(|| KaleidoError::lookup("no easing prototypes registered"))?,
        };
        if duration > 0.0 {
            ease.set_x_stretch(ease.x_stretch() / duration);
        }
        Ok((duration, ease))
    }

    /// The fade envelope of whatever the cursor points at: the selected
    /// effect in EFFECT focus, the current group otherwise.
    fn focused_fade_mut<'a>(&self, scene: &'a mut Scene) -> KaleidoResult<&'a mut Fade> {
        match self.selection.selected_effect() {
            Some(index) => {
                let current = self.selection.group_mut(&mut scene.root);
                current
                    .effect_mut(index)
                    .map(Effect::fade_mut)
                    .ok_or_else(|| KaleidoError::lookup("selected effect no longer exists"))
            }
            None => Ok(self.selection.group_mut(&mut scene.root).fade_mut()),
        }
    }

    fn write_info(&self, scene: &Scene, out: &mut dyn Write) -> KaleidoResult<()> {
        let current = self.selection.group(&scene.root);
        match self.selection.selected_effect() {
            Some(index) => {
                let effect = current.effects().get(index).ok_or_else(|| {
                    KaleidoError::lookup("selected effect no longer exists")
                })?;
                writeln!(out, "effect '{}':", effect.name())?;
                writeln!(out, "  influence: {}", effect.influence())?;
                writeln!(out, "  enabled: {}", effect.is_enabled())?;
                for (value, note) in effect.params().iter().zip(effect.param_notes()) {
                    writeln!(out, "  {note}: {value}")?;
                }
            }
            None => {
                writeln!(out, "group '{}':", current.name())?;
                let children: Vec<_> =
                    current.children().iter().map(|g| g.name().to_owned()).collect();
                write_listing(out, "child groups:", &children)?;
                let effects: Vec<_> =
                    current.effects().iter().map(|e| e.name().to_owned()).collect();
                write_listing(out, "attached effects:", &effects)?;
            }
        }
        Ok(())
    }
}

fn write_listing(out: &mut dyn Write, header: &str, names: &[String]) -> KaleidoResult<()> {
    writeln!(out, "{header}")?;
    for name in names {
        writeln!(out, "  {name}")?;
    }
    Ok(())
}

fn require_arg<'a>(args: &[&'a str], index: usize, usage: &str) -> KaleidoResult<&'a str> {
    args.get(index).copied().ok_or_else(|| {
        KaleidoError::argument(format!("usage: {} {usage}", args[0]))
    })
}

fn require_index(args: &[&str], index: usize) -> KaleidoResult<usize> {
    let raw = require_arg(args, index, "<number>")?;
    raw.parse().map_err(|_| {
        KaleidoError::argument(format!(
            "first parameter '{raw}' of '{}' must be a number",
            args[0]
        ))
    })
}
