//! Categorization prompt.

use std::fmt::Write;

use tabgrouper_protocols::TabSnapshot;

const INSTRUCTIONS: &str = "\
You organize browser tabs into groups based on the task the user is most \
likely doing with them.

Create 4-8 groups. Group names must be short (2-3 words), specific and \
task-oriented. Put every tab in exactly one group. Prefer groups of at least \
3 tabs. Order groups from entertainment, to interests, to tasks, to \
administrative.

Return the final grouping as a JSON object whose keys are group names and \
whose values are arrays of 0-based tab indices, inside a fenced block:

```json
{
  \"Specific Task Group 1\": [0, 2, 4],
  \"Specific Task Group 2\": [1, 3, 5]
}
```
";

/// Build the prompt for a snapshot.
///
/// Each tab is listed as `<index>. <title> - <url> (Parent: <title|None>)`.
pub fn build_prompt(snapshot: &TabSnapshot) -> String {
    let n = snapshot.len();
    let mut prompt = String::from(INSTRUCTIONS);

    let _ = write!(
        prompt,
        "\nInclude all {} tabs (numbered 0-{}) exactly once.\n\n",
        n,
        n.saturating_sub(1)
    );
    let _ = writeln!(prompt, "Here are the {} tabs to categorize:", n);

    for entry in snapshot.entries() {
        let parent = entry.parent.as_ref().map_or("None", |p| p.title.as_str());
        let _ = writeln!(
            prompt,
            "{}. {} - {} (Parent: {})",
            entry.index, entry.tab.title, entry.tab.url, parent
        );
    }

    prompt
}
