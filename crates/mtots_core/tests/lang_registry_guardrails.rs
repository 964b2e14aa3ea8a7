use std::collections::HashMap;

use mtots_core::lang::builtin_types;
use mtots_core::lang::keywords;
use mtots_core::lang::magic_methods;
use mtots_core::lang::symbols;

#[test]
fn keywords_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, keywords::KeywordId> = HashMap::new();

    for (index, info) in keywords::KEYWORDS.iter().enumerate() {
        assert_eq!(info.id as usize, index, "keyword table out of order at {:?}", info.id);
        assert_eq!(
            keywords::from_str(info.canonical),
            Some(info.id),
            "keyword canonical spelling not resolvable: {}",
            info.canonical
        );
        assert_eq!(keywords::as_str(info.id), info.canonical);

        if let Some(prev) = seen.insert(info.canonical, info.id) {
            panic!("duplicate keyword spelling {:?}: {:?} and {:?}", info.canonical, prev, info.id);
        }
    }
}

#[test]
fn symbol_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, symbols::SymbolId> = HashMap::new();

    for (index, info) in symbols::SYMBOLS.iter().enumerate() {
        assert_eq!(info.id as usize, index, "symbol table out of order at {:?}", info.id);
        assert_eq!(symbols::from_str(info.canonical), Some(info.id));
        assert!(
            (1..=2).contains(&info.canonical.chars().count()),
            "symbols are one or two characters: {}",
            info.canonical
        );
        if let Some(prev) = seen.insert(info.canonical, info.id) {
            panic!("duplicate symbol spelling {:?}: {:?} and {:?}", info.canonical, prev, info.id);
        }
    }
}

#[test]
fn two_char_symbols_lex_greedily() {
    for info in symbols::SYMBOLS {
        let mut chars = info.canonical.chars();
        let first = chars.next().unwrap_or(' ');
        let second = chars.next();
        assert_eq!(symbols::lex_symbol(first, second), Some(info.id), "{}", info.canonical);
    }
}

#[test]
fn magic_method_spellings_are_dunders() {
    for (index, info) in magic_methods::MAGIC_METHODS.iter().enumerate() {
        assert_eq!(info.id as usize, index, "magic method table out of order at {:?}", info.id);
        assert!(info.canonical.starts_with("__") && info.canonical.ends_with("__"));
        assert_eq!(magic_methods::from_str(info.canonical), Some(info.id));
    }
}

#[test]
fn builtin_type_names_do_not_collide_with_keywords() {
    for (index, info) in builtin_types::BUILTIN_TYPES.iter().enumerate() {
        assert_eq!(info.id as usize, index, "builtin type table out of order at {:?}", info.id);
        assert_eq!(builtin_types::from_str(info.canonical), Some(info.id));
        if info.id != builtin_types::BuiltinTypeId::Nil {
            assert_eq!(keywords::from_str(info.canonical), None, "{}", info.canonical);
        }
    }
    for name in builtin_types::TYPE_COMPLETION_NAMES {
        assert!(builtin_types::from_str(name).is_some(), "{name}");
    }
}
