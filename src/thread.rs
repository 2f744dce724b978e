//! Rebuilds conversation threads from the flat record list.
//!
//! Day files are flat: a thread is a root record plus any number of records
//! whose `thread_ts` equals the root's `ts`. Records without `thread_ts`
//! form a conversation of one.
//!
//! Grouping compares timestamps with exact floating-point equality. This is
//! how the export links replies to roots, so timestamps must reach this
//! point unrounded.

use std::collections::HashMap;

use tracing::debug;

use crate::Message;
use crate::error::{Result, SlackpackError};
use crate::metadata::UserTable;
use crate::parsing::RawRecord;

/// Hashable, bit-exact view of a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct TsKey(u64);

impl TsKey {
    fn of(ts: f64) -> Self {
        // 0.0 and -0.0 compare equal as floats; keep them in one group.
        if ts == 0.0 { TsKey(0) } else { TsKey(ts.to_bits()) }
    }
}

/// Records sharing one group key, in encounter order.
struct Group<'a> {
    key: f64,
    records: Vec<&'a RawRecord>,
}

/// Partitions conversational records by group key.
///
/// Groups come out in the order their first member was seen.
fn group_records(records: &[RawRecord]) -> Vec<Group<'_>> {
    let mut index: HashMap<TsKey, usize> = HashMap::new();
    let mut groups: Vec<Group<'_>> = Vec::new();

    for record in records.iter().filter(|r| r.is_conversational()) {
        let key = record.group_key();
        let slot = *index.entry(TsKey::of(key)).or_insert_with(|| {
            groups.push(Group {
                key,
                records: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].records.push(record);
    }

    groups
}

/// Builds one root message from a group.
///
/// # Errors
///
/// [`SlackpackError::DataConsistency`] unless exactly one record's `ts`
/// equals the group key.
fn build_thread(group: &Group<'_>, users: &UserTable) -> Result<Message> {
    let (roots, replies): (Vec<&RawRecord>, Vec<&RawRecord>) =
        group.records.iter().partition(|r| r.ts == group.key);

    let [root] = roots.as_slice() else {
        return Err(SlackpackError::DataConsistency {
            thread_ts: group.key,
            roots: roots.len(),
        });
    };

    let replies = replies
        .into_iter()
        .map(|r| Message::from_record(r, users))
        .collect();

    Ok(Message::from_record(root, users).with_replies(replies))
}

/// Turns a channel's records into root messages with their replies attached.
///
/// System records (any `subtype`) are dropped. Roots come back in the order
/// their conversations were first encountered, not sorted; replies keep
/// encounter order too.
pub fn reconstruct_threads(records: &[RawRecord], users: &UserTable) -> Result<Vec<Message>> {
    let groups = group_records(records);
    let messages = groups
        .iter()
        .map(|g| build_thread(g, users))
        .collect::<Result<Vec<_>>>()?;

    debug!(
        records = records.len(),
        threads = messages.len(),
        replies = messages.iter().map(Message::reply_count).sum::<usize>(),
        "reconstructed threads"
    );
    Ok(messages)
}

/// Sorts root messages ascending by timestamp. Ties keep their order.
pub fn sort_by_date(messages: &mut [Message]) {
    messages.sort_by_key(|m| m.timestamp);
}
