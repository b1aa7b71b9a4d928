//! Library knowledge the classifier and alias resolver consult.
//!
//! - derived views: calls whose result shares storage with the receiver
//! - wrapping calls: static factories whose result aliases an argument
//! - safe arguments: calls that only read (or only write) an argument
//! - initializer factories: calls that produce an empty or filled container
//!
//! Static owners are matched on the simple name of the call's qualifier, so
//! both `Collections.sort(x)` and `java.util.Collections.sort(x)` hit the same
//! entry. Instance methods only match when the classifier knows what the
//! receiver is; a receiver-less call never matches.

use crate::types::{ContainerFamily, Usage};

// ---------------------------------------------------------------------------
// Derived views
// ---------------------------------------------------------------------------

/// A method whose result is a live view of its receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedView {
    pub name: &'static str,
    /// Role performed by producing the view itself.
    pub implied: Usage,
}

const fn view(name: &'static str) -> DerivedView {
    DerivedView {
        name,
        implied: Usage::Ignore,
    }
}

const fn chained(name: &'static str) -> DerivedView {
    DerivedView {
        name,
        implied: Usage::Update,
    }
}

pub const COLLECTION_VIEWS: &[DerivedView] = &[
    view("subList"),
    view("headSet"),
    view("tailSet"),
    view("subSet"),
    view("headMap"),
    view("tailMap"),
    view("subMap"),
    view("descendingMap"),
    view("descendingSet"),
    view("navigableKeySet"),
    view("descendingKeySet"),
    view("keySet"),
    view("values"),
    view("entrySet"),
    view("reversed"),
    view("sequencedKeySet"),
    view("sequencedValues"),
    view("sequencedEntrySet"),
];

/// Mutators that return the receiver, so a call chain stays attached to it.
pub const STRING_BUILDER_VIEWS: &[DerivedView] = &[
    chained("append"),
    chained("appendCodePoint"),
    chained("insert"),
    chained("delete"),
    chained("deleteCharAt"),
    chained("replace"),
    chained("reverse"),
];

pub fn views(family: ContainerFamily) -> &'static [DerivedView] {
    match family {
        ContainerFamily::Collection => COLLECTION_VIEWS,
        ContainerFamily::StringBuilder => STRING_BUILDER_VIEWS,
        ContainerFamily::Array => &[],
    }
}

// ---------------------------------------------------------------------------
// Wrapping calls
// ---------------------------------------------------------------------------

/// A static factory that returns a live wrapper around one of its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrappingCall {
    pub owner: &'static str,
    pub name: &'static str,
    pub argument: usize,
    /// Only applies when the wrapped value is the sole argument.
    pub sole: bool,
}

const fn wraps(owner: &'static str, name: &'static str) -> WrappingCall {
    WrappingCall {
        owner,
        name,
        argument: 0,
        sole: false,
    }
}

/// `Objects.requireNonNull(x)` returns `x` itself.
const IDENTITY: WrappingCall = wraps("Objects", "requireNonNull");

pub const COLLECTION_WRAPPERS: &[WrappingCall] = &[
    IDENTITY,
    wraps("Collections", "synchronizedCollection"),
    wraps("Collections", "synchronizedList"),
    wraps("Collections", "synchronizedSet"),
    wraps("Collections", "synchronizedSortedSet"),
    wraps("Collections", "synchronizedNavigableSet"),
    wraps("Collections", "synchronizedMap"),
    wraps("Collections", "synchronizedSortedMap"),
    wraps("Collections", "synchronizedNavigableMap"),
    wraps("Collections", "unmodifiableCollection"),
    wraps("Collections", "unmodifiableList"),
    wraps("Collections", "unmodifiableSet"),
    wraps("Collections", "unmodifiableSortedSet"),
    wraps("Collections", "unmodifiableNavigableSet"),
    wraps("Collections", "unmodifiableMap"),
    wraps("Collections", "unmodifiableSortedMap"),
    wraps("Collections", "unmodifiableNavigableMap"),
    wraps("Collections", "unmodifiableSequencedCollection"),
    wraps("Collections", "checkedCollection"),
    wraps("Collections", "checkedList"),
    wraps("Collections", "checkedSet"),
    wraps("Collections", "checkedSortedSet"),
    wraps("Collections", "checkedNavigableSet"),
    wraps("Collections", "checkedMap"),
    wraps("Collections", "checkedSortedMap"),
    wraps("Collections", "checkedNavigableMap"),
    wraps("Collections", "checkedQueue"),
    wraps("Collections", "asLifoQueue"),
    wraps("Collections", "newSetFromMap"),
];

pub const ARRAY_WRAPPERS: &[WrappingCall] = &[
    WrappingCall {
        owner: "Arrays",
        name: "asList",
        argument: 0,
        sole: true,
    },
    IDENTITY,
    wraps("ByteBuffer", "wrap"),
    wraps("CharBuffer", "wrap"),
    wraps("ShortBuffer", "wrap"),
    wraps("IntBuffer", "wrap"),
    wraps("LongBuffer", "wrap"),
    wraps("FloatBuffer", "wrap"),
    wraps("DoubleBuffer", "wrap"),
];

pub const STRING_BUILDER_WRAPPERS: &[WrappingCall] = &[IDENTITY];

pub fn wrappers(family: ContainerFamily) -> &'static [WrappingCall] {
    match family {
        ContainerFamily::Collection => COLLECTION_WRAPPERS,
        ContainerFamily::StringBuilder => STRING_BUILDER_WRAPPERS,
        ContainerFamily::Array => ARRAY_WRAPPERS,
    }
}

// ---------------------------------------------------------------------------
// Safe arguments
// ---------------------------------------------------------------------------

/// How a registered call treats the tracked value passed to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentShape {
    /// Every argument is only read.
    Query,
    /// The first argument is written; the others are read.
    Update,
}

impl ArgumentShape {
    /// Usage of the argument at `index`.
    pub fn usage_at(self, index: usize) -> Usage {
        match (self, index) {
            (Self::Update, 0) => Usage::Update,
            _ => Usage::Query,
        }
    }
}

/// What the classifier could establish about the qualifier of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallSite<'s> {
    /// No qualifier: a method of the enclosing class.
    Unqualified,
    /// `System.out` or `System.err`.
    Console,
    /// A variable or literal whose declared type is a container or `String`.
    Container,
    /// Any other qualifier, by simple name. Also the created type of a
    /// constructor call.
    Named(&'s str),
}

/// Receivers a registry entry applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Receiver {
    /// Static method or constructor of this class.
    Class(&'static str),
    /// Instance method of a known container or string.
    Container,
    /// `PrintStream` methods on the standard streams.
    Console,
}

impl Receiver {
    pub fn accepts(self, site: CallSite<'_>) -> bool {
        match (self, site) {
            (Self::Class(owner), CallSite::Named(name)) => owner == name,
            (Self::Container, CallSite::Container) | (Self::Console, CallSite::Console) => true,
            _ => false,
        }
    }
}

/// A call that is known not to retain its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafeArgument {
    pub receiver: Receiver,
    /// Method name, or `"new"` for a constructor of the receiver class.
    pub method: &'static str,
    pub shape: ArgumentShape,
}

const fn reads(owner: &'static str, method: &'static str) -> SafeArgument {
    SafeArgument {
        receiver: Receiver::Class(owner),
        method,
        shape: ArgumentShape::Query,
    }
}

const fn container_reads(method: &'static str) -> SafeArgument {
    SafeArgument {
        receiver: Receiver::Container,
        method,
        shape: ArgumentShape::Query,
    }
}

const fn prints(method: &'static str) -> SafeArgument {
    SafeArgument {
        receiver: Receiver::Console,
        method,
        shape: ArgumentShape::Query,
    }
}

const fn writes(owner: &'static str, method: &'static str) -> SafeArgument {
    SafeArgument {
        receiver: Receiver::Class(owner),
        method,
        shape: ArgumentShape::Update,
    }
}

const fn copies(owner: &'static str) -> SafeArgument {
    reads(owner, "new")
}

pub const SAFE_ARGUMENTS: &[SafeArgument] = &[
    // Bulk operations on another container.
    container_reads("containsAll"),
    container_reads("addAll"),
    container_reads("removeAll"),
    container_reads("retainAll"),
    container_reads("putAll"),
    container_reads("equals"),
    container_reads("contentEquals"),
    container_reads("append"),
    container_reads("compareTo"),
    prints("print"),
    prints("println"),
    prints("printf"),
    prints("format"),
    prints("append"),
    reads("String", "valueOf"),
    reads("String", "join"),
    reads("String", "format"),
    reads("Objects", "equals"),
    reads("Objects", "deepEquals"),
    reads("Objects", "hash"),
    reads("Objects", "hashCode"),
    reads("Objects", "toString"),
    reads("Objects", "isNull"),
    reads("Objects", "nonNull"),
    reads("Arrays", "toString"),
    reads("Arrays", "deepToString"),
    reads("Arrays", "equals"),
    reads("Arrays", "deepEquals"),
    reads("Arrays", "hashCode"),
    reads("Arrays", "deepHashCode"),
    reads("Arrays", "stream"),
    reads("Arrays", "binarySearch"),
    reads("Arrays", "copyOf"),
    reads("Arrays", "copyOfRange"),
    reads("Arrays", "compare"),
    reads("Arrays", "mismatch"),
    reads("Collections", "max"),
    reads("Collections", "min"),
    reads("Collections", "frequency"),
    reads("Collections", "disjoint"),
    reads("Collections", "binarySearch"),
    reads("Collections", "indexOfSubList"),
    reads("Collections", "lastIndexOfSubList"),
    reads("Collections", "enumeration"),
    reads("List", "copyOf"),
    reads("Set", "copyOf"),
    reads("Map", "copyOf"),
    reads("EnumSet", "copyOf"),
    reads("Stream", "of"),
    // Update-shaped: the first argument is modified in place.
    writes("Collections", "sort"),
    writes("Collections", "shuffle"),
    writes("Collections", "reverse"),
    writes("Collections", "swap"),
    writes("Collections", "fill"),
    writes("Collections", "rotate"),
    writes("Collections", "addAll"),
    writes("Collections", "copy"),
    writes("Collections", "replaceAll"),
    writes("Arrays", "fill"),
    writes("Arrays", "sort"),
    writes("Arrays", "setAll"),
    writes("Arrays", "parallelSort"),
    writes("Arrays", "parallelSetAll"),
    writes("Arrays", "parallelPrefix"),
    // Copy constructors.
    copies("ArrayList"),
    copies("LinkedList"),
    copies("Vector"),
    copies("CopyOnWriteArrayList"),
    copies("HashSet"),
    copies("LinkedHashSet"),
    copies("TreeSet"),
    copies("CopyOnWriteArraySet"),
    copies("ConcurrentSkipListSet"),
    copies("HashMap"),
    copies("LinkedHashMap"),
    copies("TreeMap"),
    copies("EnumMap"),
    copies("IdentityHashMap"),
    copies("WeakHashMap"),
    copies("Hashtable"),
    copies("ConcurrentHashMap"),
    copies("ConcurrentSkipListMap"),
    copies("ArrayDeque"),
    copies("PriorityQueue"),
    copies("PriorityBlockingQueue"),
    copies("LinkedBlockingQueue"),
    copies("LinkedBlockingDeque"),
    copies("ConcurrentLinkedQueue"),
    copies("ConcurrentLinkedDeque"),
    copies("String"),
    copies("StringBuilder"),
    copies("StringBuffer"),
];

/// The registry entry for a call named `method` at `site`.
pub fn safe_argument(site: CallSite<'_>, method: &str) -> Option<&'static SafeArgument> {
    SAFE_ARGUMENTS
        .iter()
        .find(|entry| entry.method == method && entry.receiver.accepts(site))
}

/// Whether `new owner(x)` only copies `x`.
pub fn is_copy_constructor(owner: &str) -> bool {
    safe_argument(CallSite::Named(owner), "new").is_some()
}

/// Calls whose functional argument runs for effect only, so the value of an
/// expression lambda passed to them is discarded.
pub const VOID_CONSUMERS: &[&str] = &[
    "forEach",
    "forEachOrdered",
    "forEachRemaining",
    "ifPresent",
    "ifPresentOrElse",
];

// ---------------------------------------------------------------------------
// Initializer factories
// ---------------------------------------------------------------------------

/// A static factory whose result is a new container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Factory {
    pub owner: &'static str,
    /// Exact name, or a prefix when it ends in `*`.
    pub name: &'static str,
    /// Produces contents even when called with no arguments.
    pub always_populated: bool,
}

const fn factory(owner: &'static str, name: &'static str) -> Factory {
    Factory {
        owner,
        name,
        always_populated: false,
    }
}

const fn filled(owner: &'static str, name: &'static str) -> Factory {
    Factory {
        owner,
        name,
        always_populated: true,
    }
}

pub const COLLECTION_FACTORIES: &[Factory] = &[
    factory("Lists", "new*"),
    factory("Sets", "new*"),
    factory("Maps", "new*"),
    factory("Queues", "new*"),
    factory("List", "of"),
    factory("Set", "of"),
    factory("Map", "of"),
    factory("Map", "ofEntries"),
    factory("Arrays", "asList"),
    factory("Collections", "empty*"),
    factory("Collections", "singleton*"),
    factory("EnumSet", "noneOf"),
    filled("EnumSet", "of"),
    filled("EnumSet", "allOf"),
    filled("EnumSet", "range"),
    filled("EnumSet", "copyOf"),
    filled("EnumSet", "complementOf"),
    filled("List", "copyOf"),
    filled("Set", "copyOf"),
    filled("Map", "copyOf"),
];

pub fn factories(family: ContainerFamily) -> &'static [Factory] {
    match family {
        ContainerFamily::Collection => COLLECTION_FACTORIES,
        ContainerFamily::StringBuilder | ContainerFamily::Array => &[],
    }
}

impl Factory {
    pub fn matches(&self, owner: &str, name: &str) -> bool {
        if self.owner != owner {
            return false;
        }
        match self.name.strip_suffix('*') {
            Some(prefix) => name.starts_with(prefix),
            None => self.name == name,
        }
    }
}
