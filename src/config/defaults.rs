//! Built-in name lists for each container family.
//!
//! The query/update lists are the defaults for the user-editable tables in
//! the config file. The remaining lists are fixed: they describe library
//! types and accessors rather than project conventions.

use crate::types::ContainerFamily;

// ---------------------------------------------------------------------------
// Collection
// ---------------------------------------------------------------------------

pub const COLLECTION_QUERY_NAMES: &[&str] = &[
    "contains",
    "copyInto",
    "drainTo",
    "element",
    "equals",
    "forEach",
    "get",
    "hashCode",
    "indexOf",
    "isEmpty",
    "iterator",
    "lastIndexOf",
    "listIterator",
    "parallelStream",
    "peek",
    "propertyNames",
    "save",
    "size",
    "spliterator",
    "store",
    "stream",
    "toArray",
    "toString",
    "write",
    "first",
    "last",
    "higher",
    "lower",
    "ceiling",
    "floor",
    "compute",
    "replaceAll",
];

pub const COLLECTION_UPDATE_NAMES: &[&str] = &[
    "add", "clear", "compute", "drainTo", "insert", "load", "merge", "offer", "poll", "pop",
    "push", "put", "remove", "replace", "retain", "set", "sort", "take",
];

/// Declared types tracked as collections.
pub const COLLECTION_TYPES: &[&str] = &[
    "Collection",
    "SequencedCollection",
    "List",
    "ArrayList",
    "LinkedList",
    "CopyOnWriteArrayList",
    "Vector",
    "Stack",
    "Set",
    "SequencedSet",
    "HashSet",
    "LinkedHashSet",
    "TreeSet",
    "SortedSet",
    "NavigableSet",
    "EnumSet",
    "CopyOnWriteArraySet",
    "ConcurrentSkipListSet",
    "Map",
    "SequencedMap",
    "HashMap",
    "LinkedHashMap",
    "TreeMap",
    "SortedMap",
    "NavigableMap",
    "EnumMap",
    "IdentityHashMap",
    "WeakHashMap",
    "Hashtable",
    "Properties",
    "ConcurrentMap",
    "ConcurrentHashMap",
    "ConcurrentNavigableMap",
    "ConcurrentSkipListMap",
    "Queue",
    "Deque",
    "ArrayDeque",
    "PriorityQueue",
    "BlockingQueue",
    "BlockingDeque",
    "LinkedBlockingQueue",
    "LinkedBlockingDeque",
    "ArrayBlockingQueue",
    "PriorityBlockingQueue",
    "DelayQueue",
    "ConcurrentLinkedQueue",
    "ConcurrentLinkedDeque",
    "TransferQueue",
    "LinkedTransferQueue",
];

pub const COLLECTION_PURE_NAMES: &[&str] = &["getClass", "clone", "comparator"];

/// Collection methods declared `void`; other names are assumed to return a value.
pub const COLLECTION_VOID_NAMES: &[&str] = &[
    "clear",
    "forEach",
    "sort",
    "replaceAll",
    "putAll",
    "addFirst",
    "addLast",
    "push",
    "put",
    "ensureCapacity",
    "trimToSize",
    "addElement",
    "insertElementAt",
    "removeElementAt",
    "removeAllElements",
    "setElementAt",
    "setSize",
    "copyInto",
    "store",
    "load",
    "save",
    "list",
];

// ---------------------------------------------------------------------------
// StringBuilder
// ---------------------------------------------------------------------------

pub const STRING_BUILDER_QUERY_NAMES: &[&str] = &[
    "capacity",
    "charAt",
    "chars",
    "codePoint",
    "compareTo",
    "getChars",
    "indexOf",
    "isEmpty",
    "lastIndexOf",
    "length",
    "offsetByCodePoints",
    "subSequence",
    "substring",
    "toString",
];

pub const STRING_BUILDER_UPDATE_NAMES: &[&str] = &[
    "append",
    "delete",
    "ensureCapacity",
    "insert",
    "replace",
    "reverse",
    "setCharAt",
    "setLength",
    "trimToSize",
];

pub const STRING_BUILDER_TYPES: &[&str] = &["StringBuilder", "StringBuffer"];

pub const STRING_BUILDER_PURE_NAMES: &[&str] = &["getClass", "equals", "hashCode"];

pub const STRING_BUILDER_VOID_NAMES: &[&str] = &[
    "ensureCapacity",
    "getChars",
    "setCharAt",
    "setLength",
    "trimToSize",
];

// ---------------------------------------------------------------------------
// Array
// ---------------------------------------------------------------------------

pub const ARRAY_PURE_NAMES: &[&str] = &["clone", "equals", "hashCode", "toString", "getClass"];

// ---------------------------------------------------------------------------
// Lookup by family
// ---------------------------------------------------------------------------

/// Default query-name fragments for `family`.
pub fn query_names(family: ContainerFamily) -> &'static [&'static str] {
    match family {
        ContainerFamily::Collection => COLLECTION_QUERY_NAMES,
        ContainerFamily::StringBuilder => STRING_BUILDER_QUERY_NAMES,
        ContainerFamily::Array => &[],
    }
}

/// Default update-name fragments for `family`.
pub fn update_names(family: ContainerFamily) -> &'static [&'static str] {
    match family {
        ContainerFamily::Collection => COLLECTION_UPDATE_NAMES,
        ContainerFamily::StringBuilder => STRING_BUILDER_UPDATE_NAMES,
        ContainerFamily::Array => &[],
    }
}

/// Declared type names mapped to `family`. Arrays are recognized by shape.
pub fn type_names(family: ContainerFamily) -> &'static [&'static str] {
    match family {
        ContainerFamily::Collection => COLLECTION_TYPES,
        ContainerFamily::StringBuilder => STRING_BUILDER_TYPES,
        ContainerFamily::Array => &[],
    }
}

pub fn pure_names(family: ContainerFamily) -> &'static [&'static str] {
    match family {
        ContainerFamily::Collection => COLLECTION_PURE_NAMES,
        ContainerFamily::StringBuilder => STRING_BUILDER_PURE_NAMES,
        ContainerFamily::Array => ARRAY_PURE_NAMES,
    }
}

pub fn void_names(family: ContainerFamily) -> &'static [&'static str] {
    match family {
        ContainerFamily::Collection => COLLECTION_VOID_NAMES,
        ContainerFamily::StringBuilder => STRING_BUILDER_VOID_NAMES,
        ContainerFamily::Array => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_family_has_pure_names() {
        for family in ContainerFamily::ALL {
            assert!(!pure_names(family).is_empty(), "{family}");
        }
    }

    #[test]
    fn arrays_have_no_method_tables() {
        assert!(query_names(ContainerFamily::Array).is_empty());
        assert!(update_names(ContainerFamily::Array).is_empty());
        assert!(type_names(ContainerFamily::Array).is_empty());
    }

    #[test]
    fn type_lists_do_not_overlap() {
        for name in STRING_BUILDER_TYPES {
            assert!(!COLLECTION_TYPES.contains(name));
        }
    }
}
