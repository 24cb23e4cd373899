//! WebAssembly bindings for acx

use std::fmt::Display;

use wasm_bindgen::prelude::*;
use acx_compiler::{build_automaton, build_snapshot, optimize_patterns, parse_pattern_list};
use acx_core::{Match, PatternId, PatternSet, Snapshot};

fn js_error(e: impl Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

// =============================================================================
// Logging
// =============================================================================

/// Route library logs to the browser console. `verbose` enables debug output.
#[wasm_bindgen]
pub fn init_logging(verbose: bool) {
    let level = if verbose {
        log::Level::Debug
    } else {
        log::Level::Warn
    };
    // A second call keeps the logger installed by the first.
    let _ = console_log::init_with_level(level);
}

// =============================================================================
// PatternSet
// =============================================================================

/// Build-then-query pattern set. Insert patterns, call `compile()` once, then
/// query. Lifecycle violations throw.
#[wasm_bindgen(js_name = PatternSet)]
pub struct WasmPatternSet {
    inner: PatternSet,
    fold_case_hint: Option<bool>,
}

#[wasm_bindgen(js_class = PatternSet)]
impl WasmPatternSet {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WasmPatternSet, JsValue> {
        Ok(Self {
            inner: PatternSet::new().map_err(js_error)?,
            fold_case_hint: None,
        })
    }

    /// Load an already compiled set from an ACX snapshot.
    #[wasm_bindgen(js_name = fromSnapshot)]
    pub fn from_snapshot(snapshot_data: &[u8]) -> Result<WasmPatternSet, JsValue> {
        let snapshot = Snapshot::load(snapshot_data)
            .map_err(|e| JsValue::from_str(&format!("Failed to load snapshot: {}", e)))?;
        let fold_case = snapshot.fold_case();
        Ok(Self {
            inner: PatternSet::from(snapshot.into_automaton()),
            fold_case_hint: Some(fold_case),
        })
    }

    pub fn insert(&mut self, pattern: &[u8], id: u32, fold_case: bool) -> Result<(), JsValue> {
        self.inner
            .insert(pattern, PatternId::new(id), fold_case)
            .map_err(js_error)?;
        self.fold_case_hint.get_or_insert(fold_case);
        Ok(())
    }

    #[wasm_bindgen(js_name = insertString)]
    pub fn insert_string(&mut self, pattern: &str, id: u32, fold_case: bool) -> Result<(), JsValue> {
        self.insert(pattern.as_bytes(), id, fold_case)
    }

    pub fn compile(&mut self) -> Result<(), JsValue> {
        self.inner.compile().map_err(js_error)
    }

    #[wasm_bindgen(js_name = isCompiled)]
    pub fn is_compiled(&self) -> bool {
        self.inner.is_compiled()
    }

    /// Folding used by the first insertion, or recorded in the snapshot.
    #[wasm_bindgen(js_name = foldCaseHint)]
    pub fn fold_case_hint(&self) -> Option<bool> {
        self.fold_case_hint
    }

    #[wasm_bindgen(js_name = patternCount)]
    pub fn pattern_count(&self) -> u32 {
        self.inner.pattern_count() as u32
    }

    /// Pattern ids of every match, ordered by end offset.
    #[wasm_bindgen(js_name = findMatches)]
    pub fn find_matches(&self, text: &[u8], fold_case: bool) -> Result<js_sys::Uint32Array, JsValue> {
        let ids: Vec<u32> = self
            .inner
            .find_matches(text, fold_case)
            .map_err(js_error)?
            .map(|m| m.pattern().as_u32())
            .collect();
        Ok(js_sys::Uint32Array::from(ids.as_slice()))
    }

    /// Flat `[pattern, start, end, ...]` triples for every match.
    #[wasm_bindgen(js_name = findMatchOffsets)]
    pub fn find_match_offsets(&self, text: &[u8], fold_case: bool) -> Result<js_sys::Uint32Array, JsValue> {
        let matches = self.inner.find_matches(text, fold_case).map_err(js_error)?;
        Ok(js_sys::Uint32Array::from(flatten_matches(matches).as_slice()))
    }

    #[wasm_bindgen(js_name = isMatch)]
    pub fn is_match(&self, text: &[u8], fold_case: bool) -> Result<bool, JsValue> {
        Ok(self.inner.automaton().map_err(js_error)?.is_match(text, fold_case))
    }

    #[wasm_bindgen(js_name = toSnapshot)]
    pub fn to_snapshot(&self) -> Result<js_sys::Uint8Array, JsValue> {
        let automaton = self.inner.automaton().map_err(js_error)?;
        let bytes = build_snapshot(automaton, self.fold_case_hint.unwrap_or(false))
            .map_err(js_error)?;
        Ok(js_sys::Uint8Array::from(bytes.as_slice()))
    }
}

fn flatten_matches(matches: impl Iterator<Item = Match>) -> Vec<u32> {
    let mut out = Vec::new();
    for m in matches {
        out.push(m.pattern().as_u32());
        out.push(m.start() as u32);
        out.push(m.end() as u32);
    }
    out
}

// =============================================================================
// List compilation
// =============================================================================

#[wasm_bindgen]
pub fn compile_pattern_lists(list_texts: JsValue, fold_case: bool) -> Result<JsValue, JsValue> {
    let list_array = js_sys::Array::from(&list_texts);
    let list_count = list_array.length() as usize;

    if list_count == 0 {
        return Err(JsValue::from_str("No list texts provided"));
    }

    let mut all_entries = Vec::new();
    let mut line_counts: Vec<usize> = Vec::with_capacity(list_count);

    for (idx, value) in list_array.iter().enumerate() {
        let text = value
            .as_string()
            .ok_or_else(|| JsValue::from_str("List text must be a string"))?;

        line_counts.push(text.lines().count());

        let list_id = u16::try_from(idx).map_err(|_| JsValue::from_str("Too many lists"))?;
        let first_id = u32::try_from(all_entries.len()).map_err(|_| JsValue::from_str("Too many patterns"))?;
        let mut entries = parse_pattern_list(&text, first_id)
            .map_err(|e| JsValue::from_str(&format!("List {}: {}", idx, e)))?;
        for entry in &mut entries {
            entry.list_id = list_id;
        }
        all_entries.extend(entries);
    }

    let optimize_stats = optimize_patterns(&mut all_entries, fold_case);
    let automaton = build_automaton(&all_entries, fold_case).map_err(js_error)?;
    let snapshot = build_snapshot(&automaton, fold_case).map_err(js_error)?;

    let js_result = js_sys::Object::new();
    let snapshot_array = js_sys::Uint8Array::from(snapshot.as_slice());

    let _ = js_sys::Reflect::set(&js_result, &"snapshot".into(), &snapshot_array);
    let _ = js_sys::Reflect::set(&js_result, &"patternsBefore".into(), &JsValue::from(optimize_stats.before as u32));
    let _ = js_sys::Reflect::set(&js_result, &"patternsAfter".into(), &JsValue::from(optimize_stats.after as u32));
    let _ = js_sys::Reflect::set(&js_result, &"patternsDeduped".into(), &JsValue::from(optimize_stats.deduped as u32));
    let _ = js_sys::Reflect::set(&js_result, &"states".into(), &JsValue::from(automaton.state_count() as u32));

    let lines = js_sys::Array::new_with_length(list_count as u32);
    for (i, count) in line_counts.iter().enumerate() {
        lines.set(i as u32, JsValue::from(*count as u32));
    }
    let _ = js_sys::Reflect::set(&js_result, &"lines".into(), &lines);

    Ok(js_result.into())
}
