//! Integration tests for tree building, hit-testing and teardown.

#[cfg(test)]
mod tests {
    use tinyui::{
        Alignment, Context, WidgetFactory, WidgetId, WidgetKind,
        error::{Error, ResultCode, Result},
        geom::{Point, Rect},
        testing::TestRender,
    };

    fn context() -> Result<Context> {
        let mut ctx = Context::new("tree");
        let (_log, be) = TestRender::create();
        ctx.init_renderer(be)?;
        Ok(ctx)
    }

    /// A panel holding two buttons.
    fn sample() -> Result<Context> {
        let mut ctx = context()?;
        ctx.create_panel(1, 0, Rect::new(90, 5, 120, 400), false, None)?;
        ctx.create_button(3, 1, "Test 1", Rect::new(100, 50, 100, 40), None)?;
        ctx.create_button(4, 1, "Test 2", Rect::new(100, 100, 100, 40), None)?;
        Ok(ctx)
    }

    /// Id of the widget under a point, if any.
    fn hit(ctx: &Context, x: i32, y: i32) -> Option<WidgetId> {
        let tree = ctx.tree();
        let node = tree.find_selected_widget(tree.root()?, x, y)?;
        tree.get(node).map(|w| w.id())
    }

    #[test]
    fn sample_scenario() -> Result<()> {
        let ctx = sample()?;
        let root = ctx.tree().get(ctx.tree().root().unwrap()).unwrap();
        assert_eq!(root.id(), WidgetId::ROOT);
        assert!(root.rect().encloses(&Rect::new(90, 5, 120, 135)));

        let b = ctx.find_widget(3).unwrap();
        assert_eq!(b.kind(), WidgetKind::Button);
        assert_eq!(b.text(), "Test 1");

        assert_eq!(hit(&ctx, 150, 70), Some(WidgetId::new(3)));
        assert_eq!(hit(&ctx, 150, 120), Some(WidgetId::new(4)));
        assert_eq!(hit(&ctx, 95, 300), Some(WidgetId::new(1)));
        assert_eq!(hit(&ctx, 50, 50), None);
        Ok(())
    }

    #[test]
    fn every_widget_reachable_once() -> Result<()> {
        let ctx = sample()?;
        let mut seen = vec![];
        ctx.tree()
            .preorder(ctx.tree().root().unwrap(), &mut |_, w, _| {
                seen.push(w.id().get());
                Ok(true)
            })?;
        assert_eq!(seen, vec![0, 1, 3, 4]);
        assert_eq!(ctx.tree().len(), 4);
        Ok(())
    }

    #[test]
    fn ancestors_grow_with_children() -> Result<()> {
        let mut ctx = context()?;
        ctx.create_panel(1, 0, Rect::new(10, 10, 10, 10), false, None)?;
        ctx.create_label(2, 1, "far", Rect::new(40, 50, 5, 5), Alignment::Right)?;
        let panel = ctx.widget_by_id(1).unwrap();
        assert_eq!(panel.rect(), Rect::new(10, 10, 35, 45));
        assert_eq!(panel.rect().bottom(), Point::new(45, 55));
        let root = ctx.tree().get(ctx.tree().root().unwrap()).unwrap();
        assert_eq!(root.rect(), panel.rect());
        Ok(())
    }

    #[test]
    fn disabled_widgets_still_hit() -> Result<()> {
        let mut ctx = sample()?;
        ctx.set_enable_state(3, false)?;
        assert!(!ctx.is_enabled(3));
        assert_eq!(hit(&ctx, 150, 70), Some(WidgetId::new(3)));
        Ok(())
    }

    #[test]
    fn bad_parent_is_an_error_code() -> Result<()> {
        let mut ctx = sample()?;
        let r = ctx.create_button(9, 42, "x", Rect::new(0, 0, 1, 1), None);
        assert_eq!(r, Err(Error::UnknownParent(WidgetId::new(42))));
        assert_eq!(ResultCode::from(&r).value(), -1);
        assert_eq!(ctx.tree().len(), 4);
        assert!(ctx.widget_by_id(9).is_none());
        Ok(())
    }

    #[test]
    fn duplicate_and_reserved_ids() -> Result<()> {
        let mut ctx = sample()?;
        assert_eq!(
            ctx.create_box(3, 0, Rect::new(0, 0, 1, 1), false),
            Err(Error::DuplicateId(WidgetId::new(3)))
        );
        assert_eq!(
            ctx.create_box(0, 0, Rect::new(0, 0, 1, 1), false),
            Err(Error::ReservedId)
        );
        assert_eq!(ctx.tree().len(), 4);
        Ok(())
    }

    #[test]
    fn clear_releases_everything() -> Result<()> {
        let mut ctx = sample()?;
        ctx.clear();
        assert!(ctx.tree().is_empty());
        assert!(ctx.tree().root().is_none());
        assert!(ctx.find_widget(3).is_none());
        // The session is reusable after teardown.
        ctx.create_box(3, 0, Rect::new(0, 0, 2, 2), true)?;
        assert_eq!(ctx.tree().len(), 2);
        Ok(())
    }

    #[test]
    fn release_renderer_drops_caches() -> Result<()> {
        let mut ctx = context()?;
        ctx.create_image_button(1, 0, "icon.png", Rect::new(0, 0, 4, 4), None)?;
        assert_eq!(ctx.images().len(), 1);
        ctx.release_renderer()?;
        assert!(ctx.images().is_empty());
        assert_eq!(
            ctx.create_box(2, 0, Rect::new(0, 0, 1, 1), false),
            Err(Error::InvalidRenderHandle)
        );
        Ok(())
    }
}
