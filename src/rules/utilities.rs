//! Programs allowed after a pipe
//!
//! Only read-only text filters are accepted. Anything that can spawn a
//! shell, write files or reach the network (awk, sed, xargs, tee, less,
//! curl, ...) is rejected, and so are the few options that let an
//! allow-listed filter write a file or run a helper program.

/// Fixed allow-list of utility segment programs
pub const ALLOWED_UTILITIES: &[&str] = &[
    "cat", "column", "cut", "egrep", "fgrep", "fmt", "fold", "grep", "head", "jq", "nl", "paste",
    "rev", "sort", "tail", "tr", "uniq", "wc",
];

/// Options of an allow-listed program that write files or run programs
struct OptionPolicy {
    program: &'static str,
    /// Short options that are refused
    denied_short: &'static [char],
    /// Long options that are refused, without the leading `--`
    denied_long: &'static [&'static str],
    /// Short options whose value follows them
    short_with_value: &'static [char],
    /// Long options whose value may be the next word
    long_with_value: &'static [&'static str],
    /// More operands than this name an output file
    max_operands: Option<usize>,
}

const OPTION_POLICIES: &[OptionPolicy] = &[
    OptionPolicy {
        program: "sort",
        denied_short: &['o'],
        denied_long: &["output", "compress-program"],
        short_with_value: &['k', 't', 'S', 'T'],
        long_with_value: &[
            "key",
            "field-separator",
            "buffer-size",
            "temporary-directory",
            "parallel",
            "batch-size",
            "files0-from",
            "random-source",
        ],
        max_operands: None,
    },
    OptionPolicy {
        program: "uniq",
        denied_short: &[],
        denied_long: &[],
        short_with_value: &['f', 's', 'w'],
        long_with_value: &["skip-fields", "skip-chars", "check-chars"],
        // `uniq INPUT OUTPUT` writes OUTPUT
        max_operands: Some(1),
    },
];

/// Check whether a program name is on the allow-list. Exact match only,
/// so `/usr/bin/sort` or `./grep` are rejected.
pub fn is_allowed_utility(program: &str) -> bool {
    ALLOWED_UTILITIES.contains(&program)
}

/// Find the argument that would make an allow-listed program write a file
/// or run another program. `words` is the whole segment, program first.
///
/// Long options may be abbreviated, so any unique-looking prefix of a
/// refused option is refused too.
pub fn unsafe_argument(words: &[String]) -> Option<&str> {
    let (program, args) = words.split_first()?;
    let policy = OPTION_POLICIES.iter().find(|p| p.program == program.as_str())?;

    let mut operands = 0;
    let mut skip_value = false;
    let mut options_done = false;

    for arg in args {
        if skip_value {
            skip_value = false;
            continue;
        }

        if options_done || arg == "-" || !arg.starts_with('-') {
            operands += 1;
            if policy.max_operands.is_some_and(|max| operands > max) {
                return Some(arg.as_str());
            }
            continue;
        }

        if arg == "--" {
            options_done = true;
        } else if let Some(long) = arg.strip_prefix("--") {
            let (name, has_value) = match long.split_once('=') {
                Some((name, _)) => (name, true),
                None => (long, false),
            };
            if policy.denied_long.iter().any(|denied| denied.starts_with(name)) {
                return Some(arg.as_str());
            }
            skip_value = !has_value
                && policy
                    .long_with_value
                    .iter()
                    .any(|option| option.starts_with(name));
        } else {
            // Short option cluster such as `-ruo`
            for (i, flag) in arg.char_indices().skip(1) {
                if policy.denied_short.contains(&flag) {
                    return Some(arg.as_str());
                }
                if policy.short_with_value.contains(&flag) {
                    skip_value = i + flag.len_utf8() == arg.len();
                    break;
                }
            }
        }
    }

    None
}
