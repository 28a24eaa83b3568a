//! Long-form help with examples, shown by `grokdown help [COMMAND]`.

const OVERVIEW: &str = "
grokdown - ngrok inspector traffic as markdown

Fetch HTTP request/response data from ngrok's local inspector API and
render it as markdown that reads well for humans and language models.

COMMANDS:
  list    List captured requests
  tail    Watch for new requests in real-time
  get     Get a specific request by ID
  help    Show detailed help and examples

QUICK START:
  # Make sure ngrok is running first
  ngrok http 8080

  # View last 10 requests
  grokdown list -n 10

  # Watch for errors in real-time
  grokdown tail --errors

  # Get details of a specific request
  grokdown get <request-id>

GLOBAL OPTIONS:
  --base-url URL   ngrok inspector URL (default: http://127.0.0.1:4040,
                   env: GROKDOWN_BASE_URL)
  --debug          Log diagnostic output to stderr (RUST_LOG overrides)

For more help on a specific command, use: grokdown help <command>
";

const LIST_HELP: &str = "
LIST COMMAND

List captured requests from the ngrok inspector.

USAGE:
  grokdown list [OPTIONS]

OPTIONS:
  -n, --limit N        Number of requests to retrieve (default: 20)
  -s, --status TEXT    Status code filter (e.g. 404, 4xx, 404,5xx)
  -e, --errors         Show only error responses (status >= 400)
  -p, --path TEXT      Filter by path pattern (glob or regex)
  -d, --domain TEXT    Filter by domain name
  -t, --tunnel TEXT    Filter by tunnel name
  --since TEXT         Time window (e.g. 5s, 2m, 1h)
  --pretty             Pretty-print JSON bodies
  --truncate N         Truncate bodies to N characters
  --no-headers         Omit request and response headers
  -H, --header NAME    Only show this header (repeatable)

EXAMPLES:
  # Last 10 requests
  grokdown list -n 10

  # Only errors from the last 5 minutes
  grokdown list --errors --since 5m

  # 4xx errors on /api paths
  grokdown list --status 4xx --path \"/api/*\"

  # Pretty-printed output, truncated for an LLM prompt
  grokdown list --pretty --truncate 2000

  # From a specific tunnel
  grokdown list --tunnel my-api

FILTER COMBINATIONS:
  Multiple filters can be combined (AND logic):
  grokdown list --errors --path \"/api/*\" --since 10m
";

const TAIL_HELP: &str = "
TAIL COMMAND

Watch for new requests in real-time.

USAGE:
  grokdown tail [OPTIONS]

OPTIONS:
  -s, --status TEXT    Status code filter (e.g. 404, 4xx, 5xx)
  -e, --errors         Show only error responses (status >= 400)
  -p, --path TEXT      Filter by path pattern (glob or regex)
  -d, --domain TEXT    Filter by domain name
  -t, --tunnel TEXT    Filter by tunnel name
  --interval-ms N      Poll interval in milliseconds (default: 1000)
  --pretty             Pretty-print JSON bodies
  --truncate N         Truncate bodies to N characters
  --no-headers         Omit request and response headers
  -H, --header NAME    Only show this header (repeatable)

EXAMPLES:
  # Watch all requests
  grokdown tail

  # Watch only errors
  grokdown tail --errors

  # Watch a specific path
  grokdown tail --path \"/webhook/*\"

  # Watch 5xx errors with pretty output
  grokdown tail --status 5xx --pretty

Press Ctrl+C to stop watching.
";

const GET_HELP: &str = "
GET COMMAND

Get details of a specific request by ID.

USAGE:
  grokdown get <request-id> [OPTIONS]

ARGUMENTS:
  request-id    The ID of the request to retrieve

OPTIONS:
  --pretty             Pretty-print JSON bodies
  --truncate N         Truncate bodies to N characters
  --no-headers         Omit request and response headers
  -H, --header NAME    Only show this header (repeatable)

EXAMPLES:
  # Get a specific request
  grokdown get 548fb5c700000002

  # Get with pretty-printed JSON
  grokdown get 548fb5c700000002 --pretty

FINDING REQUEST IDS:
  Request IDs are shown in the output of 'grokdown list'.
  You can also find them in the ngrok inspector web UI.
";

/// Help text for `command`, or the overview when none is given.
pub fn get_help(command: Option<&str>) -> String {
    let Some(command) = command else {
        return OVERVIEW.trim().to_string();
    };

    let text = match command.to_ascii_lowercase().as_str() {
        "list" => LIST_HELP,
        "tail" => TAIL_HELP,
        "get" => GET_HELP,
        _ => {
            return format!("Unknown command: {command}\n\nAvailable commands: list, tail, get");
        }
    };
    text.trim().to_string()
}
