//! Go backend templates.

pub const TYPES: &str = r#"package {{ module.id }}

import (
{% if types.enums %}
	"encoding/json"
	"fmt"
{% endif %}
{% if types.imports.flags.datetime %}
	"time"
{% endif %}
{% if types.imports.flags.date %}

	"{{ opts.backend_runtime_package }}/guts"
{% endif %}
{% for m in types.modules %}
	"{{ m.go_path }}"
{% endfor %}
)
{% for decl in types.declarations %}

{{ decl.go }}
{% endfor %}
{% for enum in types.enums %}

type {{ enum.name }} string

const (
{% for member in enum.members %}
	{{ member.go_const }} {{ enum.name }} = {{ member.value|go_quote }}
{% endfor %}
)

var {{ enum.name }}Members = []{{ enum.name }}{
{% for member in enum.members %}
	{{ member.go_const }},
{% endfor %}
}

func (e {{ enum.name }}) MarshalJSON() ([]byte, error) {
	return json.Marshal(string(e))
}

func (e *{{ enum.name }}) UnmarshalJSON(b []byte) error {
	var str string
	if err := json.Unmarshal(b, &str); err != nil {
		return err
	}
	validated, err := {{ enum.name }}Validate(str)
	if err != nil {
		return err
	}
	*e = validated
	return nil
}

// {{ enum.name }}Validate returns the first member equal to input.
func {{ enum.name }}Validate(input string) ({{ enum.name }}, error) {
	for _, member := range {{ enum.name }}Members {
		if member == {{ enum.name }}(input) {
			return member, nil
		}
	}

	return "", fmt.Errorf("invalid {{ enum.name }} member: %s", input)
}

// Call this wherever you switch over {{ enum.name }}. The name carries a digest
// of the members, so adding, removing or reordering members breaks every call
// site until it has been reviewed.
func {{ enum.name }}Exhaustive{{ enum.digest }}(in {{ enum.name }}) {{ enum.name }} {
	return in
}
{% endfor %}
{% if types.string_consts %}

{% for c in types.string_consts %}
const {{ c.key }} = {{ c.value|go_quote }}
{% endfor %}
{% endif %}
"#;

pub const EVENTS: &str = r#"package {{ module.id }}

import (
{% if events.imports.flags.datetime %}
	"time"

{% endif %}
	"{{ opts.backend_runtime_package }}/event"
{% if events.imports.flags.date %}
	"{{ opts.backend_runtime_package }}/guts"
{% endif %}
{% for m in events.modules %}
	"{{ m.go_path }}"
{% endfor %}
)

var EventTypes = event.Allocators{
{% for e in events.events %}
	{{ e.key|go_quote }}: func() event.Event { return &{{ e.struct_name }}{meta: &event.EventMeta{}} },
{% endfor %}
}
{% for e in events.events %}

// {{ e.key }}
type {{ e.struct_name }} struct {
	meta *event.EventMeta
{% for f in e.fields %}
	{{ f.go_name }} {{ f.go_type }} `json:"{{ f.key }}"`
{% endfor %}
}

func New{{ e.struct_name }}({{ e.ctor_args }}) *{{ e.struct_name }} {
	return &{{ e.struct_name }}{
		meta: &meta,
{% for f in e.fields %}
		{{ f.go_name }}: {{ f.go_param }},
{% endfor %}
	}
}

func (e *{{ e.struct_name }}) Meta() *event.EventMeta { return e.meta }
func (e *{{ e.struct_name }}) MetaType() string { return {{ e.key|go_quote }} }
{% endfor %}

// listener

type EventListener interface {
{% for e in events.events %}
	Apply{{ e.struct_name }}(*{{ e.struct_name }}) error
{% endfor %}

	HandleUnknownEvent(e event.Event) error
}

func DispatchEvent(e event.Event, listener EventListener) error {
	switch {% if events.events %}typed := {% endif %}e.(type) {
{% for ev in events.events %}
	case *{{ ev.struct_name }}:
		return listener.Apply{{ ev.struct_name }}(typed)
{% endfor %}
	default:
		return listener.HandleUnknownEvent(e)
	}
}
"#;

pub const COMMANDS: &str = r#"package {{ module.id }}

import (
	"errors"
	"fmt"
{% if commands.imports.regexp %}
	"regexp"
{% endif %}
{% if commands.imports.strings %}
	"strings"
{% endif %}
{% if commands.imports.utf8 %}
	"unicode/utf8"
{% endif %}

	"{{ opts.backend_runtime_package }}/command"
{% if commands.imports.date %}
	"{{ opts.backend_runtime_package }}/guts"
{% endif %}
{% for m in commands.go_modules %}
	"{{ m.go_path }}"
{% endfor %}
)

// handlers

type CommandHandlers interface {
{% for c in commands.commands %}
	{{ c.struct_name }}(*{{ c.struct_name }}, *command.Ctx) error
{% endfor %}
}

// invoker

func CommandInvoker(handlers CommandHandlers) command.Invoker {
	return &invoker{handlers}
}

type invoker struct {
	handlers CommandHandlers
}

func (i *invoker) Invoke(cmdGeneric command.Command, ctx *command.Ctx) error {
	switch {% if commands.commands %}cmd := {% endif %}cmdGeneric.(type) {
{% for c in commands.commands %}
	case *{{ c.struct_name }}:
		return i.handlers.{{ c.struct_name }}(cmd, ctx)
{% endfor %}
	default:
		// httpcommand only hands over commands found in Allocators
		return fmt.Errorf("unknown command: %s", cmdGeneric.Key())
	}
}

// structs
{% for c in commands.commands %}
{% for r in c.regexps %}

var {{ r.var }} = regexp.MustCompile({{ r.pattern }})
{% endfor %}

// {{ c.key }}
type {{ c.struct_name }} struct {
{% for f in c.go_fields %}
	{{ f.name }} {{ f.go_type }} `json:"{{ f.key }}"`
{% endfor %}
}

func (x *{{ c.struct_name }}) Validate() error {
{% if c.go_validation %}
	{{ c.go_validation }}

{% endif %}
	return nil
}

func (x *{{ c.struct_name }}) MiddlewareChain() string { return {{ c.chain|go_quote }} }
func (x *{{ c.struct_name }}) Key() string { return {{ c.key|go_quote }} }
{% endfor %}

// allocators

var Allocators = command.Allocators{
{% for c in commands.commands %}
	{{ c.key|go_quote }}: func() command.Command { return &{{ c.struct_name }}{} },
{% endfor %}
}

// util functions

func fieldEmptyValidationError(fieldName string) error {
	return errors.New("field " + fieldName + " cannot be empty")
}

func fieldLengthValidationError(fieldName string, maxLength int, got int) error {
	return fmt.Errorf("field %s exceeded maximum length %d (got %d)", fieldName, maxLength, got)
}

func fieldPatternValidationError(fieldName string, pattern string) error {
	return fmt.Errorf("field %s does not match pattern %s", fieldName, pattern)
}

func noNewlinesValidationError(fieldName string) error {
	return errors.New("single-line field " + fieldName + " contains newlines")
}
"#;

pub const REST_ENDPOINTS: &str = r#"package {{ module.id }}

import (
	"encoding/json"
	"net/http"
{% if endpoints.uses_url_escape %}
	"net/url"
{% endif %}
{% if endpoints.imports.flags.datetime %}
	"time"
{% endif %}

	"{{ opts.backend_runtime_package }}/httpauth"
{% if endpoints.imports.flags.date %}
	"{{ opts.backend_runtime_package }}/guts"
{% endif %}
{% for m in endpoints.modules %}
	"{{ m.go_path }}"
{% endfor %}
)

type HttpHandlers interface {
{% for e in endpoints.endpoints %}
	{{ e.go_handler_signature }}
{% endfor %}
}

// RegisterRoutes wires every endpoint to its handler. Input and output structs
// are shared with the frontend, so both sides agree on the wire format.
func RegisterRoutes(handlers HttpHandlers, mwares httpauth.MiddlewareChainMap, register func(method string, path string, fn http.HandlerFunc)) {
{% for e in endpoints.endpoints %}
	register({{ e.method|go_quote }}, {{ e.registration_path|go_quote }}, func(w http.ResponseWriter, r *http.Request) {
		rctx := mwares[{{ e.chain|go_quote }}](w, r)
		if rctx == nil {
			return // middleware aborted the request and wrote the error response
		}
{% if e.consumes %}

		input := new({{ e.consumes.go }})
		if ok := parseJsonInput(w, r, input); !ok {
			return // parseJsonInput wrote the error response
		}
{% endif %}

{% if e.produces %}
		if out := handlers.{{ e.name_upper }}({{ e.go_handler_call_args }}); out != nil {
			handleJsonOutput(w, out)
		}
{% else %}
		handlers.{{ e.name_upper }}({{ e.go_handler_call_args }})
{% endif %}
	})
{% endfor %}
}

func handleJsonOutput(w http.ResponseWriter, output interface{}) {
	w.Header().Set("Content-Type", "application/json")

	if err := json.NewEncoder(w).Encode(output); err != nil {
		http.Error(w, err.Error(), http.StatusInternalServerError)
	}
}

func parseJsonInput(w http.ResponseWriter, r *http.Request, input interface{}) bool {
	if r.Header.Get("Content-Type") != "application/json" {
		http.Error(w, "expecting Content-Type with application/json header", http.StatusBadRequest)
		return false
	}

	decoder := json.NewDecoder(r.Body)
	decoder.DisallowUnknownFields()

	if err := decoder.Decode(input); err != nil {
		http.Error(w, err.Error(), http.StatusBadRequest)
		return false
	}

	return true
}

type RestClientUrlBuilder struct {
	baseUrl string
}

func NewRestClientUrlBuilder(baseUrl string) *RestClientUrlBuilder {
	return &RestClientUrlBuilder{baseUrl}
}
{% for e in endpoints.endpoints %}

// {{ e.method }} {{ e.path_raw }}
func (b *RestClientUrlBuilder) {{ e.name_upper }}({{ e.go_args }}) string {
	return b.baseUrl + {{ e.go_url }}
}
{% endfor %}
"#;

pub const UI_ROUTES: &str = r#"package {{ module.id }}

import (
	"net/http"
)

// RegisterUiRoutes serves the frontend for every route it handles. Hash routes
// are resolved client-side and need no registration.
func RegisterUiRoutes(register func(path string, fn http.HandlerFunc), uiHandler http.HandlerFunc) {
{% for r in ui_routes.routes %}
{% if r.backend_path %}
	register({{ r.backend_path|go_quote }}, uiHandler)
{% endif %}
{% endfor %}
}
"#;
