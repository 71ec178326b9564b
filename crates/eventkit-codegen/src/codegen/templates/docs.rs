//! Markdown documentation templates.

pub const EVENTS: &str = r#"Each and every *Event* additionally has the following common meta data:

- Timestamp, in UTC, the event was raised on
- ID of the user that caused that event
{% for e in events.events %}

{{ e.key }}
-------
{% if e.changelog %}

Changelog:

{% for line in e.changelog %}
- {{ line }}
{% endfor %}
{% endif %}

| key | type | notes |
|-----|------|-------|
{% for f in e.fields %}
| {{ f.key }} | {{ f.type_name }} | {{ f.notes }} |
{% endfor %}
{% endfor %}
"#;

pub const TYPES: &str = r#"{% if types.string_consts %}
Constants
---------

| const | value |
|-------|-------|
{% for c in types.string_consts %}
| {{ c.key }} | {{ c.value }} |
{% endfor %}
{% endif %}
{% for enum in types.enums %}

enum {{ enum.name }}
---------

{% for member in enum.members %}
- {{ member.value }}
{% endfor %}
{% endfor %}
{% for decl in types.declarations %}

{{ decl.name }}
---------

```
{{ decl.ts }}
```
{% endfor %}
"#;

pub const COMMANDS: &str = r#"Overview
--------

| Endpoint | Middleware | Title |
|----------|------------|-------|
{% for c in commands.commands %}
| POST /command/{{ c.key }} | {{ c.chain }} | {{ c.title }} |
{% endfor %}
{% for c in commands.commands %}

{{ c.key }}
------------
{% if c.info %}

{% for line in c.info %}
{{ line }}
{% endfor %}
{% endif %}

| Field | Type | Required | Notes |
|-------|------|----------|-------|
{% for f in c.doc_fields %}
| {{ f.key }} | {{ f.type_tag }} | {{ "yes" if f.required else "no" }} | {{ f.help }} |
{% endfor %}
{% endfor %}
"#;

pub const REST_ENDPOINTS: &str = r#"Overview
--------

| Path | Middleware | Input | Output | Notes |
|------|------------|-------|--------|-------|
{% for e in endpoints.endpoints %}
| {{ e.method }} {{ e.path_raw }} | {{ e.chain }} | {{ e.consumes.ts if e.consumes else "" }} | {{ e.produces.ts if e.produces else "" }} | {{ e.description }} |
{% endfor %}
{% for e in endpoints.endpoints %}

{{ e.method }} {{ e.path_raw }}
-------------------------

| Detail           |     |
|------------------|-----|
| Middleware chain | {{ e.chain }} |
| Consumes         | {{ e.consumes.ts if e.consumes else "" }} |
| Produces         | {{ e.produces.ts if e.produces else "" }} |
| Description      | {{ e.description }} |
{% endfor %}
"#;
