//! TypeScript frontend templates.

pub const TYPES: &str = r#"// tslint:disable
{% for m in types.modules %}
import * as {{ m.id }} from '{{ m.ts_path }}';
{% endfor %}
{% if types.imports.flags.date %}
import { dateRFC3339 } from '{{ opts.frontend_runtime_package }}types';
{% endif %}
{% if types.imports.flags.datetime %}
import { datetimeRFC3339 } from '{{ opts.frontend_runtime_package }}types';
{% endif %}
{% if types.imports.flags.binary %}
import { binaryBase64 } from '{{ opts.frontend_runtime_package }}types';
{% endif %}
{% for enum in types.enums %}

export enum {{ enum.name }} {
{% for member in enum.members %}
	{{ member.key }} = {{ member.value|js_quote }},
{% endfor %}
}

export const {{ enum.name }}Members: {{ enum.name }}[] = [
{% for member in enum.members %}
	{{ enum.name }}.{{ member.key }},
{% endfor %}
];

export function parse{{ enum.name }}(raw: string): {{ enum.name }} {
	for (const member of {{ enum.name }}Members) {
		if (member === raw) {
			return member;
		}
	}
	throw new Error('invalid {{ enum.name }} member: ' + raw);
}
{% endfor %}
{% if types.string_consts %}

{% for c in types.string_consts %}
export const {{ c.key }} = {{ c.value|js_quote }};
{% endfor %}
{% endif %}
{% for decl in types.declarations %}

{{ decl.ts }}
{% endfor %}
"#;

pub const REST_ENDPOINTS: &str = r#"// tslint:disable
{% if endpoints.imports.local_types %}
import {
{% for name in endpoints.imports.local_types %}
	{{ name }},
{% endfor %}
} from './{{ module.id }}_types';
{% endif %}
{% for m in endpoints.modules %}
import * as {{ m.id }} from '{{ m.ts_path }}';
{% endfor %}
{% if endpoints.imports.flags.date %}
import { dateRFC3339 } from '{{ opts.frontend_runtime_package }}types';
{% endif %}
{% if endpoints.imports.flags.datetime %}
import { datetimeRFC3339 } from '{{ opts.frontend_runtime_package }}types';
{% endif %}
{% if endpoints.imports.flags.binary %}
import { binaryBase64 } from '{{ opts.frontend_runtime_package }}types';
{% endif %}
import { fetchJson } from '{{ opts.frontend_runtime_package }}httputil';
{% for e in endpoints.endpoints %}

// {{ e.method }} {{ e.path_raw }}
{% if e.description %}
// {{ e.description }}
{% endif %}
export function {{ e.name }}({{ e.ts_args }}): Promise<{{ e.ts_result }}> {
	return fetchJson<{{ e.ts_result }}>({{ e.method|js_quote }}, `{{ e.ts_path }}`{% if e.consumes %}, body{% endif %});
}

export function {{ e.name }}Url({{ e.ts_url_args }}): string {
	return `{{ e.ts_path }}`;
}
{% endfor %}
"#;

pub const COMMANDS: &str = r#"// tslint:disable
{% if commands.imports.ts_local_types %}
import {
{% for name in commands.imports.ts_local_types %}
	{{ name }},
{% endfor %}
} from './{{ module.id }}_types';
{% endif %}
{% for m in commands.ts_modules %}
import * as {{ m.id }} from '{{ m.ts_path }}';
{% endfor %}
import { CommandDefinition, CommandFieldKind, CommandSettings, CrudNature } from '{{ opts.frontend_runtime_package }}commandtypes';
{% if commands.imports.ts_date %}
import { dateRFC3339 } from '{{ opts.frontend_runtime_package }}types';
{% endif %}
{% for c in commands.commands %}

// {{ c.key }}
export function {{ c.struct_name }}({% if c.ts_ctor_args %}{{ c.ts_ctor_args }}, {% endif %}settings: CommandSettings = {}): CommandDefinition {
	return {
		key: {{ c.key|js_quote }},
{% if c.additional_confirmation %}
		additional_confirmation: {{ c.additional_confirmation|js_quote }},
{% endif %}
		title: {{ c.title|js_quote }},
		crudNature: CrudNature.{{ c.crud_nature }},
		info: [{% for line in c.info %}{{ line|js_quote }}{% if not loop.last %}, {% endif %}{% endfor %}],
		fields: [
{% for f in c.ts_fields %}
			{{ f }}
{% endfor %}
		],
		settings: settings,
	};
}
{% endfor %}
"#;

pub const UI_ROUTES: &str = r#"// tslint:disable
import { InvalidQueryParam, MissingQueryParam, makeQueryParams, queryParams } from '{{ opts.frontend_runtime_package }}httputil';

export type Route = {{ ui_routes.route_union }};
{% for r in ui_routes.routes %}
{% if r.has_opts %}

export interface {{ r.opts_name }} {
{% for p in r.placeholders %}
	{{ p.name }}: string;
{% endfor %}
{% for q in r.query %}
	{{ q.key }}{% if q.nullable %}?{% endif %}: {{ q.ts_type }};
{% endfor %}
}
{% endif %}

// {{ r.path_raw }}
export function {{ r.id }}Url({% if r.has_opts %}opts: {{ r.opts_name }}{% endif %}): string {
	const query: queryParams = {};
{% for q in r.query %}
	if (opts.{{ q.key }} !== undefined) {
		query.{{ q.key }} = String(opts.{{ q.key }});
	}
{% endfor %}

	return makeQueryParams(`{{ r.ts_path }}`, query);
}

function {{ r.id }}Match(path: string, query: URLSearchParams): Route | null {
	const matches = {{ r.js_regex }}.exec(path);
	if (matches === null) {
		return null;
	}
	if (!hasOnlyKeys(query, [{% for q in r.query %}{{ q.key|js_quote }}{% if not loop.last %}, {% endif %}{% endfor %}])) {
		return null;
	}

{% if r.has_opts %}
	return {
		id: {{ r.id|js_quote }},
		opts: {
{% for p in r.placeholders %}
			{{ p.name }}: decodeURIComponent(matches[{{ p.group }}]),
{% endfor %}
{% for q in r.query %}
			{{ q.key }}: {{ q.decoder }}(query, {{ q.key|js_quote }}),
{% endfor %}
		},
	};
{% else %}
	return { id: {{ r.id|js_quote }} };
{% endif %}
}
{% endfor %}

const matchers: Array<(path: string, query: URLSearchParams) => Route | null> = [
{% for r in ui_routes.routes %}
	{{ r.id }}Match,
{% endfor %}
];

// tries routes in declaration order. A route whose path matched but whose
// query did not decode is skipped; its error is thrown if nothing else matches.
export function matchRoute(url: string): Route | null {
	const path = pathOf(url);
	const qpos = url.indexOf('?');
	const query = new URLSearchParams(qpos === -1 ? '' : url.substring(qpos + 1));

	let firstError: unknown = null;
	for (const matcher of matchers) {
		try {
			const route = matcher(path, query);
			if (route !== null) {
				return route;
			}
		} catch (err) {
			if (firstError === null) {
				firstError = err;
			}
		}
	}

	if (firstError !== null) {
		throw firstError;
	}
	return null;
}

export function dispatch<T>(url: string, onMatch: (route: Route) => T, notFound: (path: string) => T): T {
	const route = matchRoute(url);
	return route !== null ? onMatch(route) : notFound(pathOf(url));
}

// for when you need to check if url can be routed to this route collection
export function hasRouteFor(url: string): boolean {
	try {
		return matchRoute(url) !== null;
	} catch (err) {
		return false;
	}
}

// "/search?query=foo" => "/search"
function pathOf(url: string): string {
	const qpos = url.indexOf('?');
	return qpos === -1 ? url : url.substring(0, qpos);
}

function hasOnlyKeys(query: URLSearchParams, allowed: string[]): boolean {
	let ok = true;
	query.forEach((_value, key) => {
		if (allowed.indexOf(key) === -1) {
			ok = false;
		}
	});
	return ok;
}

function requiredString(query: URLSearchParams, key: string): string {
	const value = query.get(key);
	if (value === null) {
		throw new MissingQueryParam(key);
	}
	return value;
}

function optionalString(query: URLSearchParams, key: string): string | undefined {
	const value = query.get(key);
	return value === null ? undefined : value;
}

function parseInteger(key: string, raw: string): number {
	if (!/^[+-]?\d+$/.test(raw)) {
		throw new InvalidQueryParam(key, raw);
	}
	return parseInt(raw, 10);
}

function requiredInteger(query: URLSearchParams, key: string): number {
	return parseInteger(key, requiredString(query, key));
}

function optionalInteger(query: URLSearchParams, key: string): number | undefined {
	const raw = optionalString(query, key);
	return raw === undefined ? undefined : parseInteger(key, raw);
}
"#;
