//! Styled-component call sites: recognition of the `styled.*` forms and
//! synthesis of the replacement `React.forwardRef` component.

use swc_core::common::comments::Comments;
use swc_core::common::{Span, Spanned, SyntaxContext, DUMMY_SP};
use swc_core::ecma::ast::{
  ArrowExpr, AssignExpr, AssignOp, AssignPat, AssignTarget, BinExpr, BinaryOp, BindingIdent,
  BlockStmt, BlockStmtOrExpr, CallExpr, Callee, Expr, ExprOrSpread, ExprStmt, IfStmt,
  JSXAttrOrSpread, KeyValuePatProp, Lit, MemberExpr, MemberProp, ObjectPat, ObjectPatProp, Pat,
  PropName, RestPat, SimpleAssignTarget, SpreadElement, Stmt,
};

use crate::builders::{
  class_name_concat, ident, jsx_child, jsx_element, jsx_expr_attribute, member, string_expr,
  string_lit, style_boundary_element, style_object, style_sheet_element,
};
use crate::errors::{ErrorKind, TransformError};
use crate::types::{CallSiteTransformResult, StyleBody, StyledTarget};

/// A recognized styled call site, ready for the style pipeline.
#[derive(Debug)]
pub struct StyledCallSite {
  pub target: StyledTarget,
  pub body: StyleBody,
}

/// Recognize the styled forms rooted at `styled_local`:
/// `` styled.div`...` ``, `` styled("div")`...` ``, `` styled(Base)`...` ``,
/// and the object call `styled.div({ ... })`.
///
/// `Ok(None)` means the expression is unrelated to styling. `Err` means the
/// expression clearly reaches for the styled API but its target cannot be
/// resolved statically.
pub fn match_styled(
  expr: &Expr,
  styled_local: &str,
) -> Result<Option<StyledCallSite>, TransformError> {
  match expr {
    Expr::TaggedTpl(tagged) => {
      let Some(target) = classify_target(&tagged.tag, styled_local)? else {
        return Ok(None);
      };
      Ok(Some(StyledCallSite {
        target,
        body: StyleBody::Template((*tagged.tpl).clone()),
      }))
    }
    Expr::Call(call) => {
      let Callee::Expr(callee) = &call.callee else {
        return Ok(None);
      };
      let Some(target) = classify_target(callee, styled_local)? else {
        return Ok(None);
      };
      match call.args.as_slice() {
        [ExprOrSpread { spread: None, expr }] => match &**expr {
          Expr::Object(object) => Ok(Some(StyledCallSite {
            target,
            body: StyleBody::Object(object.clone()),
          })),
          Expr::Tpl(template) => Ok(Some(StyledCallSite {
            target,
            body: StyleBody::Template(template.clone()),
          })),
          Expr::Lit(Lit::Str(text)) => Ok(Some(StyledCallSite {
            target,
            body: StyleBody::Text(text.value.to_string()),
          })),
          other => Err(
            TransformError::new(
              ErrorKind::UnsupportedStyleShape,
              "styled calls accept an object, template, or string style body",
            )
            .at(other.span()),
          ),
        },
        // `styled("div")` alone is the tag-selection step of the tagged
        // template form; without a style body there is nothing to do.
        _ => Ok(None),
      }
    }
    _ => Ok(None),
  }
}

fn classify_target(
  expr: &Expr,
  styled_local: &str,
) -> Result<Option<StyledTarget>, TransformError> {
  match expr {
    Expr::Member(MemberExpr { obj, prop, span }) => {
      let Expr::Ident(obj_ident) = &**obj else {
        return Ok(None);
      };
      if obj_ident.sym != *styled_local {
        return Ok(None);
      }
      match prop {
        MemberProp::Ident(tag) => Ok(Some(StyledTarget::Tag(tag.sym.to_string()))),
        _ => Err(
          TransformError::new(
            ErrorKind::UnresolvedStyleTarget,
            "styled target must be a static tag name or component reference",
          )
          .at(*span),
        ),
      }
    }
    Expr::Call(call) => {
      let Callee::Expr(callee) = &call.callee else {
        return Ok(None);
      };
      let Expr::Ident(callee_ident) = &**callee else {
        return Ok(None);
      };
      if callee_ident.sym != *styled_local {
        return Ok(None);
      }
      match call.args.as_slice() {
        [ExprOrSpread { spread: None, expr }] => match &**expr {
          Expr::Lit(Lit::Str(tag)) => Ok(Some(StyledTarget::Tag(tag.value.to_string()))),
          Expr::Ident(component) => Ok(Some(StyledTarget::Component(component.clone()))),
          other => Err(
            TransformError::new(
              ErrorKind::UnresolvedStyleTarget,
              "styled target must be a static tag name or component reference",
            )
            .at(other.span()),
          ),
        },
        _ => Err(
          TransformError::new(
            ErrorKind::UnresolvedStyleTarget,
            "styled expects exactly one target argument",
          )
          .at(call.span),
        ),
      }
    }
    _ => Ok(None),
  }
}

/// Synthesize the replacement component:
///
/// ```text
/// React.forwardRef(({ as: C = "div", ...props }, ref) => (
///   <CC>
///     <CS hash="...">{[...]}</CS>
///     <C {...props} ref={ref} className={...} style={...} />
///   </CC>
/// ))
/// ```
pub fn build_styled_component(target: &StyledTarget, result: &CallSiteTransformResult) -> Expr {
  let component_ident = ident("C");
  let props_ident = ident("props");
  let ref_ident = ident("ref");

  let tag_default = match target {
    StyledTarget::Tag(tag) => string_expr(tag),
    StyledTarget::Component(component) => Expr::Ident(component.clone()),
  };

  let params = vec![
    Pat::Object(ObjectPat {
      span: DUMMY_SP,
      optional: false,
      type_ann: None,
      props: vec![
        ObjectPatProp::KeyValue(KeyValuePatProp {
          key: PropName::Ident(ident("as").into()),
          value: Box::new(Pat::Assign(AssignPat {
            span: DUMMY_SP,
            left: Box::new(Pat::Ident(BindingIdent {
              id: component_ident.clone(),
              type_ann: None,
            })),
            right: Box::new(tag_default),
          })),
        }),
        ObjectPatProp::Rest(RestPat {
          span: DUMMY_SP,
          dot3_token: DUMMY_SP,
          arg: Box::new(Pat::Ident(BindingIdent {
            id: props_ident.clone(),
            type_ann: None,
          })),
          type_ann: None,
        }),
      ],
    }),
    Pat::Ident(BindingIdent {
      id: ref_ident.clone(),
      type_ann: None,
    }),
  ];

  let mut attrs = vec![
    JSXAttrOrSpread::SpreadElement(SpreadElement {
      dot3_token: DUMMY_SP,
      expr: Box::new(Expr::Ident(props_ident.clone())),
    }),
    jsx_expr_attribute("ref", Expr::Ident(ref_ident)),
    jsx_expr_attribute(
      "className",
      class_name_concat(
        &result.class_name,
        member(Expr::Ident(props_ident.clone()), "className"),
      ),
    ),
  ];
  if !result.interpolations.is_empty() {
    attrs.push(jsx_expr_attribute(
      "style",
      Expr::Object(style_object(
        Some(member(Expr::Ident(props_ident), "style")),
        &result.interpolations,
      )),
    ));
  }

  let nonce_expr = result.nonce.as_ref().map(|nonce| Expr::Ident(ident(nonce)));
  let sheet = style_sheet_element(&result.fingerprint, nonce_expr.as_ref(), &result.rule_strings);
  let rendered = jsx_element("C", attrs, Vec::new());
  let boundary = style_boundary_element(vec![jsx_child(sheet), jsx_child(rendered)]);

  let arrow = ArrowExpr {
    span: DUMMY_SP,
    ctxt: SyntaxContext::empty(),
    params,
    body: Box::new(BlockStmtOrExpr::Expr(Box::new(Expr::JSXElement(Box::new(
      boundary,
    ))))),
    is_async: false,
    is_generator: false,
    type_params: None,
    return_type: None,
  };

  Expr::Call(CallExpr {
    span: DUMMY_SP,
    ctxt: SyntaxContext::empty(),
    callee: Callee::Expr(Box::new(member(Expr::Ident(ident("React")), "forwardRef"))),
    args: vec![ExprOrSpread {
      spread: None,
      expr: Box::new(Expr::Arrow(arrow)),
    }],
    type_args: None,
  })
}

/// Mark the synthesized component call side-effect free so bundlers can drop
/// components that are never referenced. Needs a comment-capable span, so the
/// caller must be running inside `GLOBALS`.
pub fn annotate_pure(component: &mut Expr, comments: &dyn Comments) {
  if let Expr::Call(call) = component {
    call.span = Span::dummy_with_cmt();
    comments.add_pure_comment(call.span.lo);
  }
}

/// `if (process.env.NODE_ENV === "development") { Name.displayName = "Name"; }`
pub fn display_name_guard(binding: &str) -> Stmt {
  let test = Expr::Bin(BinExpr {
    span: DUMMY_SP,
    op: BinaryOp::EqEqEq,
    left: Box::new(member(
      member(Expr::Ident(ident("process")), "env"),
      "NODE_ENV",
    )),
    right: Box::new(string_expr("development")),
  });

  let assignment = Expr::Assign(AssignExpr {
    span: DUMMY_SP,
    op: AssignOp::Assign,
    left: AssignTarget::Simple(SimpleAssignTarget::Member(MemberExpr {
      span: DUMMY_SP,
      obj: Box::new(Expr::Ident(ident(binding))),
      prop: MemberProp::Ident(ident("displayName").into()),
    })),
    right: Box::new(Expr::Lit(Lit::Str(string_lit(binding)))),
  });

  Stmt::If(IfStmt {
    span: DUMMY_SP,
    test: Box::new(test),
    cons: Box::new(Stmt::Block(BlockStmt {
      span: DUMMY_SP,
      ctxt: SyntaxContext::empty(),
      stmts: vec![Stmt::Expr(ExprStmt {
        span: DUMMY_SP,
        expr: Box::new(assignment),
      })],
    })),
    alt: None,
  })
}
